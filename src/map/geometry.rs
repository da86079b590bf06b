use crate::braille::BrailleCanvas;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Stroke a ring of already-projected pixel positions. Segments longer than
/// `max_jump` pixels are skipped (wrap-around artefacts).
pub fn stroke_ring(canvas: &mut BrailleCanvas, ring: &[(f64, f64)], max_jump: f64) {
    for pair in ring.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if (x1 - x0).abs() + (y1 - y0).abs() > max_jump {
            continue;
        }
        draw_line(canvas, x0 as i32, y0 as i32, x1 as i32, y1 as i32);
    }
}

/// Even-odd scanline fill of a polygon given as projected rings. A pixel is
/// set when its center lies inside.
pub fn fill_polygon(canvas: &mut BrailleCanvas, rings: &[Vec<(f64, f64)>]) {
    let (width, height) = canvas.pixel_size();
    let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
    for &(_, y) in rings.iter().flatten() {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y > max_y {
        return;
    }

    let first_row = min_y.floor().max(0.0) as usize;
    let last_row = (max_y.ceil().max(0.0) as usize).min(height);
    let mut crossings: Vec<f64> = Vec::new();

    for row in first_row..last_row {
        let cy = row as f64 + 0.5;
        crossings.clear();
        for ring in rings {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            let mut j = n - 1;
            for i in 0..n {
                let (xi, yi) = ring[i];
                let (xj, yj) = ring[j];
                if (yi > cy) != (yj > cy) {
                    crossings.push(xi + (cy - yi) * (xj - xi) / (yj - yi));
                }
                j = i;
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil().max(0.0) as usize;
            let end = (span[1] - 0.5).floor();
            if end < 0.0 {
                continue;
            }
            let end = (end as usize).min(width.saturating_sub(1));
            for x in start..=end {
                canvas.set_pixel(x, row);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        // Top dots set across every cell
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_fill_square() {
        let mut canvas = BrailleCanvas::new(3, 2);
        // Covers pixel columns 0..=3 and rows 0..=7, i.e. the first two cells of each row
        let square = vec![(0.0, 0.0), (4.0, 0.0), (4.0, 8.0), (0.0, 8.0), (0.0, 0.0)];
        fill_polygon(&mut canvas, &[square]);
        assert_eq!(canvas.to_string(), "⣿⣿⠀\n⣿⣿⠀");
    }

    #[test]
    fn test_fill_respects_hole() {
        let mut canvas = BrailleCanvas::new(4, 2);
        let outer = vec![(0.0, 0.0), (8.0, 0.0), (8.0, 8.0), (0.0, 8.0), (0.0, 0.0)];
        let hole = vec![(2.0, 0.0), (6.0, 0.0), (6.0, 8.0), (2.0, 8.0), (2.0, 0.0)];
        fill_polygon(&mut canvas, &[outer, hole]);
        assert_eq!(canvas.to_string(), "⣿⠀⠀⣿\n⣿⠀⠀⣿");
    }

    #[test]
    fn test_fill_clips_offscreen() {
        let mut canvas = BrailleCanvas::new(1, 1);
        let big = vec![(-50.0, -50.0), (50.0, -50.0), (50.0, 50.0), (-50.0, 50.0), (-50.0, -50.0)];
        fill_polygon(&mut canvas, &[big]);
        assert_eq!(canvas.to_string(), "⣿");
    }
}
