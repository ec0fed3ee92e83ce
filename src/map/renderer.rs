use crate::braille::BrailleCanvas;
use crate::map::geometry::{centroid, draw_line, fill_rings};
use crate::map::projection::Viewport;
use crate::model::{RegionShape, RegionTotalsIndex, SelectionState};
use crate::scale::ThresholdScale;
use glam::DVec2;
use ratatui::style::Color;

/// Death-count breakpoints for the choropleth classes
pub const BREAKPOINTS: [f64; 7] = [0.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0];

/// Light to dark purple, one more entry than `BREAKPOINTS`
pub const PALETTE: [Color; 8] = [
    Color::Rgb(0xE8, 0xDF, 0xF5),
    Color::Rgb(0xD4, 0xC5, 0xE8),
    Color::Rgb(0xBF, 0xAB, 0xDB),
    Color::Rgb(0xAA, 0x91, 0xCE),
    Color::Rgb(0x95, 0x77, 0xC1),
    Color::Rgb(0x80, 0x5D, 0xB4),
    Color::Rgb(0x6B, 0x43, 0xA7),
    Color::Rgb(0x56, 0x29, 0x9A),
];

/// Hovered and selected regions
pub const ACCENT: Color = Color::Rgb(0xE7, 0xD1, 0x0B);

/// Regions without a death total
pub const NO_DATA: Color = Color::Rgb(0x6B, 0x72, 0x80);

/// Portion of the canvas the map bounds should fill
const MAP_FILL: f64 = 0.94;

/// A region code placed at its centroid, in character cells
#[derive(Debug, Clone, PartialEq)]
pub struct MapLabel {
    pub col: u16,
    pub row: u16,
    pub text: String,
    pub color: Color,
}

/// Everything needed to paint one frame of the map
pub struct MapLayers {
    /// One filled canvas per region with its current colour
    pub fills: Vec<(Color, BrailleCanvas)>,
    pub outlines: BrailleCanvas,
    /// Outlines of the hovered and selected regions, painted over `outlines`
    /// so small regions keep their accent where borders share cells
    pub highlight: BrailleCanvas,
    pub labels: Vec<MapLabel>,
}

/// Choropleth of region death totals
pub struct MapRenderer {
    scale: ThresholdScale<Color>,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            scale: ThresholdScale::new(BREAKPOINTS.to_vec(), PALETTE.to_vec()),
        }
    }

    /// Classified colour, or `NO_DATA` when the region has no total
    pub fn classify(&self, death_total: Option<f64>) -> Color {
        match death_total {
            Some(total) => self.scale.classify(total),
            None => NO_DATA,
        }
    }

    /// Current fill of one region
    pub fn fill_for(
        &self,
        code: &str,
        totals: &RegionTotalsIndex,
        selection: &SelectionState,
        hovered: Option<&str>,
    ) -> Color {
        if selection.is_selected(code) || hovered == Some(code) {
            ACCENT
        } else {
            self.classify(totals.death_total(code))
        }
    }

    /// Legend entries: one per non-negative class, `0-999` … `6000+`
    pub fn legend(&self) -> Vec<(String, Color)> {
        let breaks = self.scale.breakpoints();
        breaks
            .iter()
            .enumerate()
            .map(|(i, &lo)| {
                let label = match breaks.get(i + 1) {
                    Some(&hi) => format!("{}-{}", lo, hi - 1.0),
                    None => format!("{}+", lo),
                };
                (label, self.scale.range()[i + 1])
            })
            .collect()
    }

    /// Fit the shapes' bounding box to a canvas of `width` x `height` pixels
    pub fn viewport(&self, shapes: &[RegionShape], width: usize, height: usize) -> Viewport {
        let bounds = shapes
            .iter()
            .filter_map(RegionShape::bounds)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)));
        match bounds {
            Some((min, max)) => Viewport::fit_bounds(min, max, width, height, MAP_FILL),
            // Central Australia
            None => Viewport::new(135.0, -29.5, 8.0, width, height),
        }
    }

    /// Region under pixel `(px, py)`, if any
    pub fn region_at<'a>(
        &self,
        shapes: &'a [RegionShape],
        viewport: &Viewport,
        px: f64,
        py: f64,
    ) -> Option<&'a RegionShape> {
        let (lon, lat) = viewport.unproject(px, py);
        shapes.iter().find(|s| s.contains(lon, lat))
    }

    /// Render fills, outlines and code labels for a `cols` x `rows` cell area
    pub fn render(
        &self,
        shapes: &[RegionShape],
        cols: usize,
        rows: usize,
        totals: &RegionTotalsIndex,
        selection: &SelectionState,
        hovered: Option<&str>,
    ) -> MapLayers {
        let viewport = self.viewport(shapes, cols * 2, rows * 4);
        let mut outlines = BrailleCanvas::new(cols, rows);
        let mut highlight = BrailleCanvas::new(cols, rows);
        let mut fills = Vec::with_capacity(shapes.len());
        let mut labels = Vec::with_capacity(shapes.len());

        for shape in shapes {
            let projected: Vec<Vec<Vec<DVec2>>> = shape
                .polygons
                .iter()
                .map(|rings| {
                    rings
                        .iter()
                        .map(|ring| ring.iter().map(|p| viewport.project_f(p.x, p.y)).collect())
                        .collect()
                })
                .collect();

            let fill = self.fill_for(&shape.code, totals, selection, hovered);
            let accented = fill == ACCENT;
            let mut canvas = BrailleCanvas::new(cols, rows);
            for rings in &projected {
                fill_rings(&mut canvas, rings);
                for ring in rings {
                    self.draw_ring(&mut outlines, ring, &viewport);
                    if accented {
                        self.draw_ring(&mut highlight, ring, &viewport);
                    }
                }
            }
            fills.push((fill, canvas));

            if let Some(c) = centroid(&projected) {
                if c.x >= 0.0 && c.y >= 0.0 {
                    let char_x = (c.x / 2.0) as u16;
                    let char_y = (c.y / 4.0) as u16;
                    let half = (shape.code.chars().count() / 2) as u16;
                    labels.push(MapLabel {
                        col: char_x.saturating_sub(half),
                        row: char_y,
                        text: shape.code.clone(),
                        color: if accented { ACCENT } else { Color::White },
                    });
                }
            }
        }

        MapLayers {
            fills,
            outlines,
            highlight,
            labels,
        }
    }

    /// Draw a projected ring with viewport culling
    fn draw_ring(&self, canvas: &mut BrailleCanvas, ring: &[DVec2], viewport: &Viewport) {
        let mut prev: Option<(i32, i32)> = None;
        for p in ring {
            let (px, py) = (p.x.floor() as i32, p.y.floor() as i32);
            if let Some((prev_x, prev_y)) = prev {
                if viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                    draw_line(canvas, prev_x, prev_y, px, py);
                }
            }
            prev = Some((px, py));
        }
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}
