use std::f64::consts::PI;

/// Latitude limit of the Web Mercator square
const MAX_LAT: f64 = 85.051_128_78;

/// Normalized Web Mercator x in [0, 1]
#[inline(always)]
fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Normalized Web Mercator y in [0, 1], 0 at the north edge
#[inline(always)]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

#[inline(always)]
fn inverse_mercator_y(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
}

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level (higher = more zoomed in)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Create a world view (shows entire world)
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(0.0, 20.0, 1.0, width, height)
    }

    /// Center and zoom so the bounds fill the canvas, leaving `padding`
    /// (fraction of each side) free. Degenerate bounds get a fixed zoom.
    pub fn fit_bounds(bbox: (f64, f64, f64, f64), width: usize, height: usize, padding: f64) -> Self {
        let (min_lon, min_lat, max_lon, max_lat) = bbox;
        let x0 = mercator_x(min_lon);
        let x1 = mercator_x(max_lon);
        let y0 = mercator_y(max_lat);
        let y1 = mercator_y(min_lat);

        let usable = (1.0 - 2.0 * padding).max(0.1);
        let w = width.max(1) as f64;
        let h = height.max(1) as f64;
        let zoom_x = if x1 > x0 { usable / (x1 - x0) } else { f64::INFINITY };
        let zoom_y = if y1 > y0 { usable * h / ((y1 - y0) * w) } else { f64::INFINITY };
        let zoom = zoom_x.min(zoom_y);
        let zoom = if zoom.is_finite() { zoom } else { 50.0 };

        let center_lon = (min_lon + max_lon) / 2.0;
        let center_lat = inverse_mercator_y((y0 + y1) / 2.0);
        Self::new(center_lon, center_lat, zoom, width, height)
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = 360.0 / (self.zoom * self.width.max(1) as f64);
        self.center_lon += dx as f64 * scale;
        self.center_lat -= dy as f64 * scale * 0.5; // Mercator distortion

        // Wrap longitude
        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }

        self.center_lat = self.center_lat.clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(100.0);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(0.5);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom by factor, keeping the point under the cursor fixed
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(0.5, 100.0);
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.zoom * self.width.max(1) as f64;
        let x = (px as f64 - self.width as f64 / 2.0) / scale + mercator_x(self.center_lon);
        let y = (py as f64 - self.height as f64 / 2.0) / scale + mercator_y(self.center_lat);
        (x * 360.0 - 180.0, inverse_mercator_y(y))
    }

    /// Project to fractional pixel coordinates
    #[inline]
    pub fn project_f(&self, lon: f64, lat: f64) -> (f64, f64) {
        let scale = self.zoom * self.width as f64;
        let px = (mercator_x(lon) - mercator_x(self.center_lon)) * scale + self.width as f64 / 2.0;
        let py = (mercator_y(lat) - mercator_y(self.center_lat)) * scale + self.height as f64 / 2.0;
        (px, py)
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (px, py) = self.project_f(lon, lat);
        (px as i32, py as i32)
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::new(10.0, 30.0, 3.0, 400, 200);
        let (px, py) = vp.project(12.0, 31.0);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon - 12.0).abs() < 0.5);
        assert!((lat - 31.0).abs() < 0.5);
    }

    #[test]
    fn test_poles_stay_finite() {
        let vp = Viewport::world(200, 100);
        let (_, y) = vp.project_f(0.0, -90.0);
        assert!(y.is_finite());
    }

    #[test]
    fn test_fit_bounds_contains_box() {
        let bbox = (80.0, 26.0, 88.0, 30.5);
        let vp = Viewport::fit_bounds(bbox, 120, 80, 0.05);
        for (lon, lat) in [(80.0, 26.0), (88.0, 30.5), (84.0, 28.0)] {
            let (x, y) = vp.project_f(lon, lat);
            assert!((0.0..=120.0).contains(&x), "x {x}");
            assert!((0.0..=80.0).contains(&y), "y {y}");
        }
        // One of the axes is tight
        let (x0, _) = vp.project_f(80.0, 28.0);
        let (x1, _) = vp.project_f(88.0, 28.0);
        let (_, y0) = vp.project_f(84.0, 30.5);
        let (_, y1) = vp.project_f(84.0, 26.0);
        assert!((x1 - x0) > 100.0 || (y1 - y0) > 70.0);
    }
}
