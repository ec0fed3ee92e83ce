mod chart_widget;
pub mod layout;
mod map_widget;

use crate::app::{App, Tab};
use crate::braille::{BrailleCanvas, BLANK};
use crate::chart::{expenditure_tooltip, ChartPanel};
use crate::format;
use crate::overlay::FullscreenState;
use chart_widget::{ChartColors, ChartWidget, DEATH_COLORS, EXPENDITURE_COLORS, VACCINATION_COLORS};
use map_widget::MapWidget;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

const TOOLTIP_TITLE: Color = Color::Rgb(0xFF, 0x66, 0x66);

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let layout = layout::compute(frame.area(), app.tab, app.overlay);

    render_tabs(frame, app, layout.tabs);
    match app.tab {
        Tab::Mortality => {
            if app.mortality.is_some() {
                if let Some(area) = layout.map {
                    render_map(frame, app, area);
                }
                if let Some(area) = layout.deaths {
                    render_chart(frame, &app.deaths_panel, DEATH_COLORS, None, true, area);
                }
                if let Some(area) = layout.vaccinations {
                    render_chart(frame, &app.vaccination_panel, VACCINATION_COLORS, None, true, area);
                }
            } else {
                render_unloaded(frame, "Mortality", app.mortality_error.as_deref(), layout.body);
            }
        }
        Tab::Expenditure => {
            if let Some(area) = layout.expenditure {
                if app.expenditure.is_some() {
                    render_chart(
                        frame,
                        &app.expenditure_panel,
                        EXPENDITURE_COLORS,
                        app.hovered_bar,
                        false,
                        area,
                    );
                } else {
                    render_unloaded(frame, "Expenditure", app.expenditure_error.as_deref(), area);
                }
            }
        }
    }
    render_status_bar(frame, app, layout.status);
    render_tooltip(frame, app);
}

/// Paint a braille canvas layer in one colour, skipping empty cells
fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    for (row_idx, row) in canvas.rows().enumerate() {
        if row_idx >= area.height as usize {
            break;
        }
        let y = area.y + row_idx as u16;

        for (col_idx, ch) in row.enumerate() {
            if col_idx >= area.width as usize {
                break;
            }
            if ch == BLANK {
                continue;
            }
            let x = area.x + col_idx as u16;
            buf[(x, y)].set_char(ch).set_fg(color);
        }
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = Tabs::new(vec![" COVID-19 by State ", " Health Expenditure "])
        .select(app.tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, area);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let Some(data) = &app.mortality else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " COVID-19 Deaths by State ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layers = app.map_renderer.render(
        &data.shapes,
        inner.width as usize,
        inner.height as usize,
        &data.totals,
        &app.selection,
        app.hovered_region.as_deref(),
    );
    frame.render_widget(MapWidget { layers }, inner);
    render_legend(frame, app, inner);
}

fn render_legend(frame: &mut Frame, app: &App, map: Rect) {
    let entries = app.map_renderer.legend();
    let Some(area) = layout::legend(map, entries.len()) else {
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        "Death Cases",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(entries.into_iter().map(|(label, color)| {
        Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::styled(label, Style::default().fg(Color::Gray)),
        ])
    }));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_chart(
    frame: &mut Frame,
    panel: &ChartPanel,
    colors: ChartColors,
    hovered: Option<usize>,
    expandable: bool,
    area: Rect,
) {
    let Some(geometry) = &panel.geometry else {
        return;
    };
    frame.render_widget(
        ChartWidget {
            geometry,
            elapsed: panel.elapsed(),
            colors,
            hovered,
            expandable,
        },
        area,
    );
}

/// Placeholder for a view whose data did not load
fn render_unloaded(frame: &mut Frame, view: &str, error: Option<&str>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {view} "),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    let text = vec![
        Line::from(Span::styled(
            format!("{view} data could not be loaded."),
            Style::default().fg(Color::Red),
        )),
        Line::from(Span::styled(
            error.unwrap_or("unknown error").to_string(),
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Lines of the tooltip for whatever is under the pointer
fn tooltip_lines(app: &App) -> Option<Vec<String>> {
    match app.tab {
        Tab::Mortality => {
            let code = app.hovered_region.as_deref()?;
            let data = app.mortality.as_ref()?;
            let name = data
                .shapes
                .iter()
                .find(|s| s.code == code)
                .map_or(code, |s| s.name.as_str());
            let deaths = data
                .totals
                .death_total(code)
                .map_or_else(|| "no data".to_string(), format::count);
            let vaccinations = data
                .totals
                .vaccination_total(code)
                .map_or_else(|| "no data".to_string(), |v| format::millions(v, 2));
            Some(vec![
                name.to_string(),
                format!("Deaths: {deaths}"),
                format!("Vaccinations: {vaccinations}"),
            ])
        }
        Tab::Expenditure => {
            let index = app.hovered_bar?;
            let geometry = app.expenditure_panel.geometry.as_ref()?;
            geometry.marks.get(index).map(|m| expenditure_tooltip(&m.datum))
        }
    }
}

fn render_tooltip(frame: &mut Frame, app: &App) {
    let (Some((col, row)), Some(lines)) = (app.mouse_pos, tooltip_lines(app)) else {
        return;
    };
    let screen = frame.area();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 4;
    let height = lines.len() as u16 + 2;
    if width > screen.width || height > screen.height {
        return;
    }
    // Offset from the pointer, flipped when it would leave the screen
    let x = if col + 2 + width <= screen.x + screen.width {
        col + 2
    } else {
        col.saturating_sub(width + 1)
    };
    let y = if row + 1 + height <= screen.y + screen.height {
        row + 1
    } else {
        row.saturating_sub(height)
    };
    let area = Rect::new(x, y, width, height);

    let mut text = Vec::with_capacity(lines.len());
    for (i, line) in lines.into_iter().enumerate() {
        let style = if i == 0 {
            Style::default().fg(TOOLTIP_TITLE).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        text.push(Line::from(Span::styled(line, style)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let showing = match app.selection.selected() {
        Some(code) => app
            .mortality
            .as_ref()
            .and_then(|d| d.record(code))
            .map_or(code, |r| r.name.as_str())
            .to_string(),
        None => "Australia".to_string(),
    };
    let overlay = match app.overlay {
        FullscreenState::Normal => "",
        FullscreenState::DeathsFullscreen => " [deaths enlarged]",
        FullscreenState::VaccinationFullscreen => " [vaccinations enlarged]",
    };

    let status = Line::from(vec![
        Span::styled(" Showing: ", Style::default().fg(Color::DarkGray)),
        Span::styled(showing, Style::default().fg(Color::Yellow)),
        Span::styled(overlay, Style::default().fg(Color::Magenta)),
        Span::styled(
            " | click:select  Tab:view  d/v:enlarge  Esc:restore  q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{cell_of, sample_views, views};
    use crate::error::DataError;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> Buffer {
        let backend = TestBackend::new(app.area.width, app.area.height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_map_legend_and_charts() {
        let app = App::new(views(), 120, 40);
        let screen = text(&draw(&app));
        assert!(screen.contains("COVID-19 Deaths by State"));
        assert!(screen.contains("Death Cases"));
        assert!(screen.contains("6000+"));
        assert!(screen.contains(" COVID-19 Deaths ─"));
        assert!(screen.contains(" Vaccinations ─"));
        assert!(screen.contains("Australia"));
        assert!(screen.contains("NSW"));
        assert!(screen.contains("[⤢]"));
        assert!(screen.contains("2021"));
    }

    #[test]
    fn hovered_region_is_accented_with_tooltip() {
        let mut app = App::new(views(), 120, 40);
        let (col, row) = cell_of(&app, "NSW");
        app.hover(col, row);
        let buf = draw(&app);
        let screen = text(&buf);
        assert!(screen.contains("New South Wales"));
        assert!(screen.contains("Deaths: 6,110"));
        assert!(screen.contains("Vaccinations: 20.60M"));

        let accented = buf
            .content()
            .iter()
            .any(|cell| cell.fg == crate::map::ACCENT);
        assert!(accented);
    }

    fn accent_cells(buf: &Buffer) -> usize {
        buf.content()
            .iter()
            .filter(|cell| cell.fg == crate::map::ACCENT)
            .count()
    }

    #[test]
    fn small_selected_region_keeps_accent() {
        for (width, height) in [(120, 40), (160, 50), (200, 60)] {
            let mut app = App::new(sample_views(), width, height);
            let (col, row) = cell_of(&app, "ACT");
            app.click(col, row);
            assert_eq!(app.selection.selected(), Some("ACT"));
            // Pointer over the charts so only the selection is accented
            app.hover(width - 1, height / 2);
            assert_eq!(app.hovered_region, None);
            assert!(accent_cells(&draw(&app)) > 0, "{width}x{height}");
        }
    }

    #[test]
    fn fullscreen_hides_other_chart() {
        let mut app = App::new(views(), 120, 40);
        app.toggle_fullscreen(FullscreenState::VaccinationFullscreen);
        let screen = text(&draw(&app));
        assert!(!screen.contains(" COVID-19 Deaths ─"));
        assert!(screen.contains("Vaccinations"));
        assert!(screen.contains("[vaccinations enlarged]"));
    }

    #[test]
    fn expenditure_tab_shows_tooltip_for_hovered_bar() {
        let mut app = App::new(views(), 120, 40);
        app.next_tab();
        app.hovered_bar = Some(0);
        app.mouse_pos = Some((10, 10));
        let screen = text(&draw(&app));
        assert!(screen.contains("Health Expenditure Trend"));
        assert!(screen.contains("Expenditure (Million AUD)"));
        assert!(screen.contains("AU$203,200M"));
        assert!(screen.contains("203,200 million"));
    }

    #[test]
    fn unloaded_view_shows_placeholder() {
        let mut loaded = views();
        loaded.mortality = Err(DataError::EmptyBoundaries {
            path: "aus.json".into(),
        });
        let app = App::new(loaded, 120, 40);
        let screen = text(&draw(&app));
        assert!(screen.contains("Mortality data could not be loaded."));
        assert!(screen.contains("No polygon features found in aus.json"));
    }
}
