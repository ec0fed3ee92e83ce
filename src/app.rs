use crate::chart::{build_detail_charts, build_expenditure_chart, ChartPanel};
use crate::data::{error_chain, LoadedViews};
use crate::map::{MapRenderer, BREAKPOINTS};
use crate::model::{ExpenditureSeries, MortalityDataset, SelectionState};
use crate::overlay::FullscreenState;
use crate::ui::layout::{self, ScreenLayout};
use ratatui::layout::{Position, Rect};

/// Top-level views, switched with Tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Mortality,
    Expenditure,
}

impl Tab {
    pub fn index(self) -> usize {
        match self {
            Tab::Mortality => 0,
            Tab::Expenditure => 1,
        }
    }
}

/// Application state
pub struct App {
    /// Map and detail charts, absent when any of their sources failed
    pub mortality: Option<MortalityDataset>,
    pub mortality_error: Option<String>,
    pub expenditure: Option<ExpenditureSeries>,
    pub expenditure_error: Option<String>,
    pub map_renderer: MapRenderer,
    pub selection: SelectionState,
    pub hovered_region: Option<String>,
    pub hovered_bar: Option<usize>,
    pub overlay: FullscreenState,
    pub tab: Tab,
    /// Current mouse position for tooltips
    pub mouse_pos: Option<(u16, u16)>,
    /// Terminal area used for hit-testing
    pub area: Rect,
    pub deaths_panel: ChartPanel,
    pub vaccination_panel: ChartPanel,
    pub expenditure_panel: ChartPanel,
    pub should_quit: bool,
}

impl App {
    pub fn new(views: LoadedViews, width: u16, height: u16) -> Self {
        let (mortality, mortality_error) = match views.mortality {
            Ok(data) => (Some(data), None),
            Err(e) => (None, Some(error_chain(&e))),
        };
        let (expenditure, expenditure_error) = match views.expenditure {
            Ok(series) => (Some(series), None),
            Err(e) => (None, Some(error_chain(&e))),
        };

        let mut app = Self {
            mortality,
            mortality_error,
            expenditure,
            expenditure_error,
            map_renderer: MapRenderer::new(),
            selection: SelectionState::default(),
            hovered_region: None,
            hovered_bar: None,
            overlay: FullscreenState::Normal,
            tab: Tab::Mortality,
            mouse_pos: None,
            area: Rect::new(0, 0, width, height),
            deaths_panel: ChartPanel::new(),
            vaccination_panel: ChartPanel::new(),
            expenditure_panel: ChartPanel::new(),
            should_quit: false,
        };

        app.rebuild_detail();
        if let Some(series) = &app.expenditure {
            app.expenditure_panel.rebuild(build_expenditure_chart(series));
        }
        app
    }

    /// Update the hit-testing area when the terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
    }

    pub fn layout(&self) -> ScreenLayout {
        layout::compute(self.area, self.tab, self.overlay)
    }

    /// Tear down and rebuild both detail charts for the current selection
    fn rebuild_detail(&mut self) {
        if let Some(data) = &self.mortality {
            let charts = build_detail_charts(data, &self.selection);
            self.deaths_panel.rebuild(charts.deaths);
            self.vaccination_panel.rebuild(charts.vaccinations);
        }
    }

    /// Region code under a terminal cell
    pub fn region_at_cell(&self, col: u16, row: u16) -> Option<&str> {
        let data = self.mortality.as_ref()?;
        let inner = layout::inner(self.layout().map?);
        let at = Position::new(col, row);
        if !inner.contains(at) {
            return None;
        }
        if layout::legend(inner, BREAKPOINTS.len()).is_some_and(|legend| legend.contains(at)) {
            return None;
        }
        let viewport = self.map_renderer.viewport(
            &data.shapes,
            inner.width as usize * 2,
            inner.height as usize * 4,
        );
        // Sample the centre of the cell
        let px = (col - inner.x) as f64 * 2.0 + 1.0;
        let py = (row - inner.y) as f64 * 4.0 + 2.0;
        self.map_renderer
            .region_at(&data.shapes, &viewport, px, py)
            .map(|shape| shape.code.as_str())
    }

    /// Expenditure bar under a terminal cell
    fn bar_at_cell(&self, col: u16, row: u16) -> Option<usize> {
        let panel = self.layout().expenditure?;
        let geometry = self.expenditure_panel.geometry.as_ref()?;
        let plot = layout::plot_area(panel, geometry);
        if plot.width == 0 || !plot.contains(Position::new(col, row)) {
            return None;
        }
        let x = ((col - plot.x) as f64 + 0.5) / plot.width as f64;
        geometry.mark_at(x)
    }

    /// Pointer moved: update hover state for the map and expenditure bars
    pub fn hover(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        let region = self.region_at_cell(col, row).map(str::to_string);
        if region != self.hovered_region {
            tracing::trace!(region = ?region, "hover");
            self.hovered_region = region;
        }
        self.hovered_bar = self.bar_at_cell(col, row);
    }

    /// Left click: expand buttons first, then map regions
    pub fn click(&mut self, col: u16, row: u16) {
        let layout = self.layout();
        let at = Position::new(col, row);
        if layout
            .deaths
            .is_some_and(|p| layout::expand_button(p).contains(at))
        {
            self.toggle_fullscreen(FullscreenState::DeathsFullscreen);
            return;
        }
        if layout
            .vaccinations
            .is_some_and(|p| layout::expand_button(p).contains(at))
        {
            self.toggle_fullscreen(FullscreenState::VaccinationFullscreen);
            return;
        }

        if let Some(code) = self.region_at_cell(col, row).map(str::to_string) {
            self.selection.toggle(&code);
            tracing::debug!(region = %code, selected = ?self.selection.selected(), "selection changed");
            self.rebuild_detail();
        }
    }

    /// Whether any chart is still running its enter animations
    pub fn is_animating(&self) -> bool {
        [
            &self.deaths_panel,
            &self.vaccination_panel,
            &self.expenditure_panel,
        ]
        .iter()
        .any(|panel| panel.is_animating())
    }

    pub fn toggle_fullscreen(&mut self, target: FullscreenState) {
        if self.tab != Tab::Mortality {
            return;
        }
        self.overlay = self.overlay.toggle(target);
        tracing::debug!(overlay = ?self.overlay, "fullscreen toggled");
    }

    pub fn escape(&mut self) {
        self.overlay = self.overlay.escape();
    }

    pub fn next_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Mortality => Tab::Expenditure,
            Tab::Expenditure => Tab::Mortality,
        };
        self.hovered_region = None;
        self.hovered_bar = None;
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::{join_mortality, CsvRow};
    use crate::error::DataError;
    use crate::model::{ChartDatum, RegionShape, YearlyRow};
    use glam::DVec2;

    fn rect_shape(code: &str, name: &str, lon: f64, lat: f64, w: f64, h: f64) -> RegionShape {
        RegionShape {
            code: code.to_string(),
            name: name.to_string(),
            polygons: vec![vec![vec![
                DVec2::new(lon, lat),
                DVec2::new(lon + w, lat),
                DVec2::new(lon + w, lat + h),
                DVec2::new(lon, lat + h),
                DVec2::new(lon, lat),
            ]]],
        }
    }

    fn csv_row(key: &str, values: [f64; 4], total: Option<f64>) -> CsvRow {
        CsvRow {
            row: YearlyRow {
                key: key.to_string(),
                values,
            },
            total,
        }
    }

    pub(crate) fn views() -> LoadedViews {
        let deaths = vec![
            csv_row("NSW", [620.0, 3200.0, 1750.0, 540.0], Some(6110.0)),
            csv_row("VIC", [1300.0, 3500.0, 1650.0, 520.0], Some(6970.0)),
        ];
        let vaccinations = vec![
            csv_row("NSW", [1.2e7, 1.89e7, 2.01e7, 2.06e7], None),
            csv_row("VIC", [1.0e7, 1.5e7, 1.6e7, 1.7e7], None),
        ];
        let shapes = vec![
            rect_shape("NSW", "New South Wales", 141.0, -37.0, 12.0, 8.0),
            rect_shape("VIC", "Victoria", 141.0, -39.0, 12.0, 2.0),
            rect_shape("TAS", "Tasmania", 144.0, -43.5, 4.0, 3.0),
        ];
        LoadedViews {
            mortality: Ok(join_mortality(deaths, vaccinations, shapes)),
            expenditure: Ok(ExpenditureSeries {
                country: "Australia".to_string(),
                data: vec![
                    ChartDatum::new("2019", 203200.0),
                    ChartDatum::new("2020", 223300.0),
                    ChartDatum::new("2021", 245100.0),
                    ChartDatum::new("2022", 254000.0),
                ],
            }),
        }
    }

    pub(crate) fn sample_views() -> LoadedViews {
        crate::data::load_views(&crate::data::tests::sample_config())
    }

    /// Terminal cell inside the region, found by scanning the map
    pub(crate) fn cell_of(app: &App, code: &str) -> (u16, u16) {
        let inner = layout::inner(app.layout().map.unwrap());
        for row in inner.y..inner.y + inner.height {
            for col in inner.x..inner.x + inner.width {
                if app.region_at_cell(col, row) == Some(code) {
                    return (col, row);
                }
            }
        }
        panic!("{code} not on screen");
    }

    #[test]
    fn starts_with_national_charts() {
        let app = App::new(views(), 120, 40);
        assert_eq!(app.deaths_panel.shape_count(), 4);
        assert_eq!(app.vaccination_panel.shape_count(), 4);
        assert_eq!(app.expenditure_panel.shape_count(), 4);
        let deaths = app.deaths_panel.geometry.as_ref().unwrap();
        assert_eq!(deaths.subtitle, "Australia");
    }

    #[test]
    fn click_selects_then_clears() {
        let mut app = App::new(views(), 120, 40);
        let (col, row) = cell_of(&app, "NSW");
        app.click(col, row);
        assert_eq!(app.selection.selected(), Some("NSW"));
        assert_eq!(
            app.deaths_panel.geometry.as_ref().unwrap().subtitle,
            "New South Wales"
        );
        assert_eq!(app.deaths_panel.shape_count(), 4);

        app.click(col, row);
        assert_eq!(app.selection.selected(), None);
        assert_eq!(app.deaths_panel.geometry.as_ref().unwrap().subtitle, "Australia");
    }

    #[test]
    fn region_without_data_shows_no_data_charts() {
        let mut app = App::new(views(), 120, 40);
        let (col, row) = cell_of(&app, "TAS");
        app.click(col, row);
        let deaths = app.deaths_panel.geometry.as_ref().unwrap();
        assert_eq!(deaths.subtitle, "Tasmania (no data)");
    }

    #[test]
    fn legend_cells_do_not_hit_regions() {
        let mut app = App::new(sample_views(), 120, 40);
        let inner = layout::inner(app.layout().map.unwrap());
        let legend = layout::legend(inner, BREAKPOINTS.len()).unwrap();

        // A legend cell that has a region painted underneath it
        let covered = {
            let data = app.mortality.as_ref().unwrap();
            let viewport = app.map_renderer.viewport(
                &data.shapes,
                inner.width as usize * 2,
                inner.height as usize * 4,
            );
            legend
                .positions()
                .find(|p| {
                    let px = (p.x - inner.x) as f64 * 2.0 + 1.0;
                    let py = (p.y - inner.y) as f64 * 4.0 + 2.0;
                    app.map_renderer
                        .region_at(&data.shapes, &viewport, px, py)
                        .is_some()
                })
                .expect("no region under the legend")
        };

        assert_eq!(app.region_at_cell(covered.x, covered.y), None);
        app.hover(covered.x, covered.y);
        app.click(covered.x, covered.y);
        assert_eq!(app.hovered_region, None);
        assert_eq!(app.selection.selected(), None);
    }

    #[test]
    fn settles_after_enter_animations() {
        let mut app = App::new(views(), 120, 40);
        assert!(app.is_animating());
        for panel in [
            &mut app.deaths_panel,
            &mut app.vaccination_panel,
            &mut app.expenditure_panel,
        ] {
            panel.geometry = None;
        }
        assert!(!app.is_animating());
    }

    #[test]
    fn hover_tracks_region_and_clears_off_map() {
        let mut app = App::new(views(), 120, 40);
        let (col, row) = cell_of(&app, "VIC");
        app.hover(col, row);
        assert_eq!(app.hovered_region.as_deref(), Some("VIC"));
        app.hover(119, 20);
        assert_eq!(app.hovered_region, None);
        assert_eq!(app.mouse_pos, Some((119, 20)));
    }

    #[test]
    fn expand_button_and_escape() {
        let mut app = App::new(views(), 120, 40);
        let button = layout::expand_button(app.layout().deaths.unwrap());
        app.click(button.x + 1, button.y);
        assert_eq!(app.overlay, FullscreenState::DeathsFullscreen);
        assert!(app.layout().vaccinations.is_none());
        app.escape();
        assert_eq!(app.overlay, FullscreenState::Normal);
    }

    #[test]
    fn expenditure_hover_finds_bar() {
        let mut app = App::new(views(), 120, 40);
        app.next_tab();
        let panel = app.layout().expenditure.unwrap();
        let geometry = app.expenditure_panel.geometry.clone().unwrap();
        let plot = layout::plot_area(panel, &geometry);
        let col = plot.x + (geometry.marks[2].center() * plot.width as f64) as u16;
        app.hover(col, plot.y + plot.height - 1);
        assert_eq!(app.hovered_bar, Some(2));
        // Fullscreen only applies to the detail charts
        app.toggle_fullscreen(FullscreenState::DeathsFullscreen);
        assert_eq!(app.overlay, FullscreenState::Normal);
    }

    #[test]
    fn failed_view_keeps_other_view() {
        let mut loaded = views();
        loaded.expenditure = Err(DataError::MissingCountry {
            path: "healthExpenditure.json".into(),
            country: "Australia".to_string(),
        });
        let app = App::new(loaded, 120, 40);
        assert!(app.expenditure.is_none());
        assert!(app.expenditure_error.as_deref().unwrap().contains("Australia"));
        assert_eq!(app.deaths_panel.shape_count(), 4);
        assert_eq!(app.expenditure_panel.shape_count(), 0);
    }
}
