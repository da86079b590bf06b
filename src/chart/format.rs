/// Whole number with comma thousands separators, e.g. `1,234,567`
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Short axis label: `7.9B`, `340M`, `12K`, `950`
pub fn format_compact(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    let abs = value.abs();
    for (scale, suffix) in UNITS {
        if abs >= scale {
            let scaled = value / scale;
            return if scaled.fract().abs() < 1e-9 || scaled.abs() >= 100.0 {
                format!("{scaled:.0}{suffix}")
            } else {
                let text = format!("{scaled:.1}");
                format!("{}{suffix}", text.trim_end_matches(".0"))
            };
        }
    }
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
