use crate::app::Tab;
use crate::chart::ChartGeometry;
use crate::overlay::FullscreenState;
use ratatui::layout::{Constraint, Layout, Rect};

/// Screen regions for one frame. Both the renderer and mouse hit-testing
/// use this so they always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub tabs: Rect,
    pub body: Rect,
    pub status: Rect,
    pub map: Option<Rect>,
    pub deaths: Option<Rect>,
    pub vaccinations: Option<Rect>,
    pub expenditure: Option<Rect>,
}

pub fn compute(area: Rect, tab: Tab, overlay: FullscreenState) -> ScreenLayout {
    let [tabs, body, status] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
            .areas(area);

    let mut layout = ScreenLayout {
        tabs,
        body,
        status,
        map: None,
        deaths: None,
        vaccinations: None,
        expenditure: None,
    };

    match tab {
        Tab::Mortality => {
            let [map, charts] =
                Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
                    .areas(body);
            layout.map = Some(map);
            match overlay {
                FullscreenState::Normal => {
                    let [deaths, vaccinations] =
                        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                            .areas(charts);
                    layout.deaths = Some(deaths);
                    layout.vaccinations = Some(vaccinations);
                }
                FullscreenState::DeathsFullscreen => layout.deaths = Some(charts),
                FullscreenState::VaccinationFullscreen => layout.vaccinations = Some(charts),
            }
        }
        Tab::Expenditure => layout.expenditure = Some(body),
    }
    layout
}

/// Inside of a bordered block
pub fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

const LEGEND_WIDTH: u16 = 14;

/// Legend box in the bottom-left corner of the map's inner area: a heading
/// plus one row per entry. `None` when the map is too small to hold it.
pub fn legend(map: Rect, entries: usize) -> Option<Rect> {
    let height = entries as u16 + 1;
    if map.height < height || map.width < LEGEND_WIDTH {
        return None;
    }
    Some(Rect::new(
        map.x,
        map.y + map.height - height,
        LEGEND_WIDTH,
        height,
    ))
}

/// The `[⤢]` button on a panel's top border
pub fn expand_button(panel: Rect) -> Rect {
    Rect {
        x: panel.x + panel.width.saturating_sub(5),
        y: panel.y,
        width: 3.min(panel.width),
        height: 1.min(panel.height),
    }
}

/// Plotting rectangle of a chart panel: inside the border, right of the
/// tick gutter, below the subtitle and label rows, above the year row.
pub fn plot_area(panel: Rect, geometry: &ChartGeometry) -> Rect {
    let inner = inner(panel);
    let gutter = geometry
        .y_ticks
        .iter()
        .map(|t| t.label.chars().count())
        .max()
        .unwrap_or(1) as u16
        + 1;
    let top = 2;
    Rect {
        x: inner.x + gutter.min(inner.width),
        y: inner.y + top.min(inner.height),
        width: inner.width.saturating_sub(gutter),
        height: inner.height.saturating_sub(top + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 120,
        height: 40,
    };

    #[test]
    fn normal_shows_map_and_both_charts() {
        let layout = compute(AREA, Tab::Mortality, FullscreenState::Normal);
        let (map, deaths, vaccinations) = (
            layout.map.unwrap(),
            layout.deaths.unwrap(),
            layout.vaccinations.unwrap(),
        );
        assert_eq!(deaths.x, vaccinations.x);
        assert!(deaths.y < vaccinations.y);
        assert_eq!(map.x + map.width, deaths.x);
        assert_eq!(layout.tabs.height, 1);
        assert_eq!(layout.status.y, 39);
        assert!(layout.expenditure.is_none());
    }

    #[test]
    fn fullscreen_fills_chart_column_and_keeps_map() {
        let normal = compute(AREA, Tab::Mortality, FullscreenState::Normal);
        let full = compute(AREA, Tab::Mortality, FullscreenState::VaccinationFullscreen);
        assert_eq!(full.map, normal.map);
        assert!(full.deaths.is_none());
        let column = full.vaccinations.unwrap();
        assert_eq!(column.height, normal.body.height);
        assert_eq!(column.x, normal.deaths.unwrap().x);
    }

    #[test]
    fn expenditure_uses_whole_body() {
        let layout = compute(AREA, Tab::Expenditure, FullscreenState::Normal);
        assert_eq!(layout.expenditure, Some(layout.body));
        assert!(layout.map.is_none());
    }

    #[test]
    fn legend_hugs_bottom_left_of_map() {
        let map = Rect::new(1, 2, 67, 36);
        assert_eq!(legend(map, 7), Some(Rect::new(1, 30, 14, 8)));
        assert_eq!(legend(Rect::new(1, 2, 67, 7), 7), None);
        assert_eq!(legend(Rect::new(1, 2, 10, 36), 7), None);
    }

    #[test]
    fn button_sits_on_top_border() {
        let panel = Rect::new(70, 1, 50, 19);
        let button = expand_button(panel);
        assert_eq!(button, Rect::new(115, 1, 3, 1));
    }
}
