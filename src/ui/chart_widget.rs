use super::{layout, render_layer};
use crate::braille::BrailleCanvas;
use crate::chart::{ChartGeometry, MarkKind};
use crate::map::geometry::{draw_circle, draw_dotted_hline, draw_line, fill_rect};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};
use std::time::Duration;

/// Colours of one chart
#[derive(Debug, Clone, Copy)]
pub struct ChartColors {
    pub title: Color,
    pub mark: Color,
    pub hovered: Color,
    pub line: Color,
    pub label: Color,
}

pub const DEATH_COLORS: ChartColors = ChartColors {
    title: Color::Rgb(0xFF, 0x66, 0x66),
    mark: Color::Rgb(0xFF, 0x66, 0x66),
    hovered: Color::Rgb(0xFF, 0x66, 0x66),
    line: Color::Rgb(0xCC, 0x00, 0x00),
    label: Color::Rgb(0xCC, 0x00, 0x00),
};

pub const VACCINATION_COLORS: ChartColors = ChartColors {
    title: Color::Rgb(0x00, 0x99, 0xFF),
    mark: Color::Rgb(0x00, 0xBC, 0xD4),
    hovered: Color::Rgb(0x00, 0xBC, 0xD4),
    line: Color::Rgb(0x00, 0x99, 0xFF),
    label: Color::Rgb(0x00, 0x99, 0xFF),
};

pub const EXPENDITURE_COLORS: ChartColors = ChartColors {
    title: Color::Rgb(0x00, 0xD4, 0xFF),
    mark: Color::Rgb(0x00, 0x66, 0xCC),
    hovered: Color::Rgb(0x00, 0xD4, 0xFF),
    line: Color::Rgb(0x00, 0x66, 0xCC),
    label: Color::Rgb(0x00, 0x66, 0xCC),
};

const GRID: Color = Color::DarkGray;
const AXIS: Color = Color::Gray;

/// A chart panel: bordered block, optional `[⤢]` button, and the chart
/// painted at its current animation time.
pub struct ChartWidget<'a> {
    pub geometry: &'a ChartGeometry,
    pub elapsed: Duration,
    pub colors: ChartColors,
    pub hovered: Option<usize>,
    pub expandable: bool,
}

impl ChartWidget<'_> {
    /// Unit-box y to a pixel row (0 at the top)
    fn pixel_y(y: f64, ph: usize) -> i32 {
        ((1.0 - y) * ph.saturating_sub(1) as f64).round() as i32
    }

    fn pixel_x(x: f64, pw: usize) -> i32 {
        (x * pw as f64).round() as i32
    }

    fn paint_marks(&self, plot: Rect, buf: &mut Buffer) {
        let (cols, rows) = (plot.width as usize, plot.height as usize);
        let (pw, ph) = (cols * 2, rows * 4);
        let mut grid = BrailleCanvas::new(cols, rows);
        let mut axes = BrailleCanvas::new(cols, rows);
        let mut marks = BrailleCanvas::new(cols, rows);
        let mut hovered = BrailleCanvas::new(cols, rows);
        let mut line = BrailleCanvas::new(cols, rows);

        for tick in &self.geometry.y_ticks {
            let y = Self::pixel_y(tick.pos, ph);
            draw_dotted_hline(&mut grid, 0, pw as i32 - 1, y, 4);
        }
        let bottom = ph as i32 - 1;
        draw_line(&mut axes, 0, 0, 0, bottom);
        draw_line(&mut axes, 0, bottom, pw as i32 - 1, bottom);

        for (i, mark) in self.geometry.marks.iter().enumerate() {
            let canvas = if self.hovered == Some(i) {
                &mut hovered
            } else {
                &mut marks
            };
            let top = Self::pixel_y(mark.animated_y(self.elapsed), ph);
            match self.geometry.kind {
                MarkKind::Bar => {
                    let x0 = Self::pixel_x(mark.x, pw);
                    let x1 = Self::pixel_x(mark.x + mark.width, pw);
                    fill_rect(canvas, x0, top, x1, bottom);
                }
                MarkKind::Dot => {
                    draw_circle(canvas, Self::pixel_x(mark.center(), pw), top, 1);
                }
            }
        }

        if let Some(transition) = self.geometry.line {
            let points: Vec<(f64, f64)> = self
                .geometry
                .marks
                .iter()
                .map(|m| {
                    (
                        m.center() * pw as f64,
                        (1.0 - m.y) * ph.saturating_sub(1) as f64,
                    )
                })
                .collect();
            draw_partial_polyline(&mut line, &points, transition.progress(self.elapsed));
        }

        render_layer(&grid, GRID, plot, buf);
        render_layer(&axes, AXIS, plot, buf);
        render_layer(&line, self.colors.line, plot, buf);
        render_layer(&marks, self.colors.mark, plot, buf);
        render_layer(&hovered, self.colors.hovered, plot, buf);
    }

    fn paint_text(&self, inner: Rect, plot: Rect, buf: &mut Buffer) {
        let axis_style = Style::default().fg(AXIS);
        let ph = plot.height as usize * 4;

        // Tick labels, right-aligned against the plot
        for tick in &self.geometry.y_ticks {
            let row = plot.y + (Self::pixel_y(tick.pos, ph).max(0) as u16) / 4;
            let len = tick.label.chars().count() as u16;
            let x = plot.x.saturating_sub(len + 1).max(inner.x);
            buf.set_string(x, row, &tick.label, axis_style);
        }

        // Years under the bands
        let year_row = plot.y + plot.height;
        if year_row < inner.y + inner.height {
            for tick in &self.geometry.x_ticks {
                let center = plot.x + (tick.pos * plot.width as f64) as u16;
                let len = tick.label.chars().count() as u16;
                buf.set_string(center.saturating_sub(len / 2), year_row, &tick.label, axis_style);
            }
        }

        // Value labels just above each mark
        let label_style = Style::default()
            .fg(self.colors.label)
            .add_modifier(Modifier::BOLD);
        for mark in &self.geometry.marks {
            if !mark.label_visible(self.elapsed) {
                continue;
            }
            let top = Self::pixel_y(mark.label_y(self.elapsed), ph).max(0) as u16 / 4;
            let row = (plot.y + top).saturating_sub(1).max(inner.y + 1);
            let len = mark.label.chars().count() as u16;
            let center = plot.x + (mark.center() * plot.width as f64) as u16;
            let x = center.saturating_sub(len / 2).max(inner.x);
            let room = (inner.x + inner.width).saturating_sub(x) as usize;
            let shown: String = mark.label.chars().take(room).collect();
            buf.set_string(x, row, shown, label_style);
        }

        // Subtitle, plus the axis caption when there is one
        let mut subtitle = self.geometry.subtitle.clone();
        if let Some(caption) = &self.geometry.y_caption {
            subtitle = format!("{subtitle} - {caption}");
        }
        let shown: String = subtitle.chars().take(inner.width as usize).collect();
        buf.set_string(
            inner.x,
            inner.y,
            shown,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        );
    }
}

/// Draw `points` as a polyline, only the first `progress` of its segments
fn draw_partial_polyline(canvas: &mut BrailleCanvas, points: &[(f64, f64)], progress: f64) {
    if points.len() < 2 || progress <= 0.0 {
        return;
    }
    let drawn = progress.clamp(0.0, 1.0) * (points.len() - 1) as f64;
    for (i, pair) in points.windows(2).enumerate() {
        let portion = (drawn - i as f64).clamp(0.0, 1.0);
        if portion == 0.0 {
            break;
        }
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        let (ex, ey) = (x0 + (x1 - x0) * portion, y0 + (y1 - y0) * portion);
        draw_line(
            canvas,
            x0.round() as i32,
            y0.round() as i32,
            ex.round() as i32,
            ey.round() as i32,
        );
    }
}

impl Widget for ChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {} ", self.geometry.title),
                Style::default()
                    .fg(self.colors.title)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.expandable && area.width >= 10 {
            let button = layout::expand_button(area);
            buf.set_string(button.x, button.y, "[⤢]", Style::default().fg(Color::White));
        }

        let plot = layout::plot_area(area, self.geometry);
        if plot.width < 2 || plot.height < 2 {
            return;
        }
        self.paint_marks(plot, buf);
        self.paint_text(inner, plot, buf);
    }
}
