use glam::DVec2;
use std::f64::consts::PI;

/// Viewport representing the visible map area
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-90 to 90)
    pub center_lat: f64,
    /// Zoom level (1.0 = whole world across the canvas width)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Normalized Web Mercator coordinates, both axes in [0, 1] for the world.
#[inline]
fn mercator(lon: f64, lat: f64) -> DVec2 {
    let x = (lon + 180.0) / 360.0;
    let lat_rad = lat.clamp(-85.0, 85.0) * PI / 180.0;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    DVec2::new(x, y)
}

#[inline]
fn inverse_mercator(m: DVec2) -> (f64, f64) {
    let lon = m.x * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * m.y)).sinh().atan();
    (lon, lat_rad * 180.0 / PI)
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

    /// Centre on the bounding box and zoom so it fills `fill` of the canvas.
    pub fn fit_bounds(min: DVec2, max: DVec2, width: usize, height: usize, fill: f64) -> Self {
        let top_left = mercator(min.x, max.y);
        let bottom_right = mercator(max.x, min.y);
        let span = (bottom_right - top_left).abs().max(DVec2::splat(1e-9));
        let (center_lon, center_lat) = inverse_mercator((top_left + bottom_right) / 2.0);

        let w = width.max(1) as f64;
        let h = height.max(1) as f64;
        // scale = zoom * width; the box must fit both axes
        let zoom = (w / span.x).min(h / span.y) / w * fill;

        Self::new(center_lon, center_lat, zoom, width, height)
    }

    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    /// Project a geographic coordinate (lon, lat) to sub-pixel coordinates
    pub fn project_f(&self, lon: f64, lat: f64) -> DVec2 {
        let p = mercator(lon, lat);
        let c = mercator(self.center_lon, self.center_lat);
        let half = DVec2::new(self.width as f64, self.height as f64) / 2.0;
        (p - c) * self.scale() + half
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: f64, py: f64) -> (f64, f64) {
        let c = mercator(self.center_lon, self.center_lat);
        let half = DVec2::new(self.width as f64, self.height as f64) / 2.0;
        let m = (DVec2::new(px, py) - half) / self.scale() + c;
        inverse_mercator(m)
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0
            && min_x < self.width as i32
            && max_y >= 0
            && min_y < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        let p = vp.project_f(0.0, 0.0);
        assert_eq!(p, DVec2::new(50.0, 50.0));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::new(135.0, -29.5, 6.0, 200, 160);
        let p = vp.project_f(150.0, -33.9);
        let (lon, lat) = vp.unproject(p.x, p.y);
        assert!((lon - 150.0).abs() < 1e-9);
        assert!((lat + 33.9).abs() < 1e-9);
    }

    #[test]
    fn test_fit_bounds_keeps_box_on_canvas() {
        let min = DVec2::new(113.0, -44.0);
        let max = DVec2::new(154.0, -10.0);
        let vp = Viewport::fit_bounds(min, max, 120, 100, 0.95);
        for (lon, lat) in [(min.x, min.y), (max.x, max.y), (min.x, max.y), (max.x, min.y)] {
            let p = vp.project_f(lon, lat);
            assert!(p.x >= 0.0 && p.x <= 120.0, "x out of canvas: {p}");
            assert!(p.y >= 0.0 && p.y <= 100.0, "y out of canvas: {p}");
        }
        // The tighter axis should nearly fill its extent
        let tl = vp.project_f(min.x, max.y);
        let br = vp.project_f(max.x, min.y);
        let used = ((br.x - tl.x) / 120.0).max((br.y - tl.y) / 100.0);
        assert!((used - 0.95).abs() < 1e-6);
    }
}
