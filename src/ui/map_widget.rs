use super::render_layer;
use crate::map::{MapLayers, ACCENT};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// Braille choropleth with code labels overlaid
pub struct MapWidget {
    pub layers: MapLayers,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: region fills, outlines, accented outlines, labels
        for (color, canvas) in &self.layers.fills {
            render_layer(canvas, *color, area, buf);
        }
        render_layer(&self.layers.outlines, Color::White, area, buf);
        render_layer(&self.layers.highlight, ACCENT, area, buf);

        for label in &self.layers.labels {
            if label.row >= area.height || label.col >= area.width {
                continue;
            }
            let max_len = area.width.saturating_sub(label.col) as usize;
            let shown: String = label.text.chars().take(max_len).collect();
            let style = Style::default()
                .fg(label.color)
                .add_modifier(Modifier::BOLD);
            buf.set_string(area.x + label.col, area.y + label.row, shown, style);
        }
    }
}
