/// Linear map from a data domain onto a pixel range
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Extend the domain outward to round tick values
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut previous = 0.0;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == previous || !step.is_finite() || step <= 0.0 {
                break;
            }
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
            previous = step;
        }
        self.domain = if reversed { (stop, start) } else { (start, stop) };
        self
    }

    /// Roughly `count` evenly spaced round values inside the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let (start, stop) = (d0.min(d1), d0.max(d1));
        if start == stop {
            return vec![start];
        }
        let step = tick_increment(start, stop, count);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }
        let first = (start / step).ceil() as i64;
        let last = (stop / step).floor() as i64;
        // Steps below 1 divide by the inverse to keep 0.1-style ticks exact
        let inverse = (1.0 / step).round();
        (first..=last)
            .map(|i| if step < 1.0 { i as f64 / inverse } else { i as f64 * step })
            .collect()
    }
}

/// 1, 2 or 5 times a power of ten, close to `(stop - start) / count`
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * 10f64.powf(power)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_and_invert() {
        let scale = LinearScale::new((0.0, 100.0), (40.0, 0.0));
        assert_eq!(scale.apply(0.0), 40.0);
        assert_eq!(scale.apply(100.0), 0.0);
        assert_eq!(scale.invert(20.0), 50.0);
    }

    #[test]
    fn test_nice_rounds_outward() {
        let scale = LinearScale::new((0.0, 7_951_150_000.0), (0.0, 1.0)).nice(10);
        assert_eq!(scale.domain, (0.0, 8_000_000_000.0));
        let scale = LinearScale::new((-0.4, 2.13), (0.0, 1.0)).nice(5);
        assert_eq!(scale.domain, (-0.5, 2.5));
    }

    #[test]
    fn test_ticks() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let scale = LinearScale::new((1960.0, 2030.0), (0.0, 1.0));
        assert_eq!(scale.ticks(7), vec![1960.0, 1970.0, 1980.0, 1990.0, 2000.0, 2010.0, 2020.0, 2030.0]);
        let scale = LinearScale::new((0.0, 1.0), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_degenerate_domain() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(scale.apply(5.0), 5.0);
        assert_eq!(scale.ticks(5), vec![5.0]);
    }
}
