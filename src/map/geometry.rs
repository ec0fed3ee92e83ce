use crate::braille::BrailleCanvas;
use glam::DVec2;

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

/// Dotted horizontal line, every `gap`-th pixel (gridlines)
pub fn draw_dotted_hline(canvas: &mut BrailleCanvas, x0: i32, x1: i32, y: i32, gap: i32) {
    let gap = gap.max(1);
    for x in (x0..=x1).step_by(gap as usize) {
        canvas.set_pixel_signed(x, y);
    }
}

/// Draw a filled circle (dots on line charts)
pub fn draw_circle(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                canvas.set_pixel_signed(cx + dx, cy + dy);
            }
        }
    }
}

/// Fill the pixel rectangle `[x0, x1) x [y0, y1)`
pub fn fill_rect(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    for y in y0..y1 {
        for x in x0..x1 {
            canvas.set_pixel_signed(x, y);
        }
    }
}

/// Scanline fill of a set of rings in pixel space using the even-odd rule,
/// so interior rings punch holes. Pixels are sampled at their centres.
pub fn fill_rings(canvas: &mut BrailleCanvas, rings: &[Vec<DVec2>]) {
    let (min_y, max_y) = rings
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }

    let (_, canvas_h) = canvas.pixel_size();
    let y_start = (min_y.floor() as i32).max(0);
    let y_end = (max_y.ceil() as i32).min(canvas_h as i32);
    let mut crossings: Vec<f64> = Vec::new();

    for y in y_start..y_end {
        let sample = y as f64 + 0.5;
        crossings.clear();
        for ring in rings {
            for edge in ring.windows(2) {
                let (a, b) = (edge[0], edge[1]);
                if (a.y <= sample) != (b.y <= sample) {
                    let t = (sample - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for span in crossings.chunks_exact(2) {
            let x0 = (span[0] - 0.5).ceil() as i32;
            let x1 = (span[1] - 0.5).floor() as i32;
            for x in x0.max(0)..=x1 {
                canvas.set_pixel_signed(x, y);
            }
        }
    }
}

/// Even-odd point in ring test (ring may or may not repeat its first point).
pub fn ring_contains(ring: &[DVec2], p: DVec2) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Signed area of a closed ring (shoelace)
fn signed_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| ring[i].perp_dot(ring[(i + 1) % n]))
        .sum::<f64>()
        / 2.0
}

/// Area-weighted centroid of a set of polygons (each a list of rings, first
/// ring exterior). Holes subtract. Falls back to the mean vertex when the
/// total area is degenerate.
pub fn centroid(polygons: &[Vec<Vec<DVec2>>]) -> Option<DVec2> {
    let mut area_sum = 0.0;
    let mut weighted = DVec2::ZERO;

    for rings in polygons {
        for (idx, ring) in rings.iter().enumerate() {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            let area = signed_area(ring).abs();
            let sign = if idx == 0 { 1.0 } else { -1.0 };
            let c = ring_centroid(ring)?;
            area_sum += sign * area;
            weighted += c * sign * area;
        }
    }

    if area_sum.abs() > 1e-12 {
        return Some(weighted / area_sum);
    }

    let points: Vec<DVec2> = polygons.iter().flatten().flatten().copied().collect();
    if points.is_empty() {
        return None;
    }
    Some(points.iter().copied().sum::<DVec2>() / points.len() as f64)
}

fn ring_centroid(ring: &[DVec2]) -> Option<DVec2> {
    let a = signed_area(ring);
    if a.abs() < 1e-12 {
        return Some(ring.iter().copied().sum::<DVec2>() / ring.len() as f64);
    }
    let n = ring.len();
    let mut c = DVec2::ZERO;
    for i in 0..n {
        let (p, q) = (ring[i], ring[(i + 1) % n]);
        c += (p + q) * p.perp_dot(q);
    }
    Some(c / (6.0 * a))
}
