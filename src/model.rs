use glam::DVec2;
use std::collections::HashMap;

/// Years covered by the deaths and vaccination datasets.
pub const YEARS: [&str; 4] = ["2021", "2022", "2023", "2024"];

/// Year whose vaccination count is treated as the current total.
pub const CURRENT_YEAR: &str = "2024";

/// Years covered by the health expenditure dataset.
pub const EXPENDITURE_YEARS: [&str; 4] = ["2019", "2020", "2021", "2022"];

/// One CSV row: region key plus its four yearly values.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyRow {
    pub key: String,
    pub values: [f64; 4],
}

/// A state with its death and vaccination figures joined by code.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRecord {
    pub code: String,
    pub name: String,
    pub deaths: [f64; 4],
    pub death_total: f64,
    pub vaccinations: Option<[f64; 4]>,
}

/// Lookup tables used for map colouring and tooltips.
#[derive(Debug, Clone, Default)]
pub struct RegionTotalsIndex {
    deaths: HashMap<String, f64>,
    vaccinations: HashMap<String, f64>,
}

impl RegionTotalsIndex {
    pub fn new(deaths: HashMap<String, f64>, vaccinations: HashMap<String, f64>) -> Self {
        Self { deaths, vaccinations }
    }

    pub fn death_total(&self, code: &str) -> Option<f64> {
        self.deaths.get(code).copied()
    }

    pub fn vaccination_total(&self, code: &str) -> Option<f64> {
        self.vaccinations.get(code).copied()
    }
}

/// Outline of one region in lon/lat. Each polygon is a list of rings;
/// the first ring is the exterior, the rest are holes.
#[derive(Debug, Clone)]
pub struct RegionShape {
    pub code: String,
    pub name: String,
    pub polygons: Vec<Vec<Vec<DVec2>>>,
}

impl RegionShape {
    /// Even-odd containment across all rings of all polygons.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let p = DVec2::new(lon, lat);
        self.polygons
            .iter()
            .flatten()
            .filter(|ring| crate::map::ring_contains(ring, p))
            .count()
            % 2
            == 1
    }

    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        let mut points = self.polygons.iter().flatten().flatten();
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), &p| (min.min(p), max.max(p))))
    }
}

/// Everything the mortality/vaccination view needs, built once at load.
#[derive(Debug, Clone)]
pub struct MortalityDataset {
    pub records: Vec<RegionRecord>,
    pub death_rows: Vec<YearlyRow>,
    pub vaccination_rows: Vec<YearlyRow>,
    pub totals: RegionTotalsIndex,
    pub shapes: Vec<RegionShape>,
}

impl MortalityDataset {
    pub fn record(&self, code: &str) -> Option<&RegionRecord> {
        self.records.iter().find(|r| r.code == code)
    }

    pub fn shape_at(&self, lon: f64, lat: f64) -> Option<&RegionShape> {
        self.shapes.iter().find(|s| s.contains(lon, lat))
    }
}

/// Currently highlighted region; `None` means the national aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.as_deref() == Some(code)
    }

    /// Click semantics: the selected region clears, any other region replaces it.
    pub fn toggle(&mut self, code: &str) {
        if self.is_selected(code) {
            self.selected = None;
        } else {
            self.selected = Some(code.to_string());
        }
    }
}

/// (year label, value) pair used by every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartDatum {
    pub label: String,
    pub value: f64,
}

impl ChartDatum {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Expenditure figures (million AUD) for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenditureSeries {
    pub country: String,
    pub data: Vec<ChartDatum>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(code: &str, x0: f64, y0: f64, size: f64) -> RegionShape {
        RegionShape {
            code: code.to_string(),
            name: code.to_string(),
            polygons: vec![vec![vec![
                DVec2::new(x0, y0),
                DVec2::new(x0 + size, y0),
                DVec2::new(x0 + size, y0 + size),
                DVec2::new(x0, y0 + size),
                DVec2::new(x0, y0),
            ]]],
        }
    }

    #[test]
    fn toggle_same_region_returns_to_national() {
        let mut sel = SelectionState::default();
        sel.toggle("NSW");
        assert_eq!(sel.selected(), Some("NSW"));
        sel.toggle("NSW");
        assert_eq!(sel.selected(), None);
    }

    #[test]
    fn toggle_other_region_replaces() {
        let mut sel = SelectionState::default();
        sel.toggle("NSW");
        sel.toggle("VIC");
        assert!(sel.is_selected("VIC"));
        assert!(!sel.is_selected("NSW"));
    }

    #[test]
    fn shape_with_hole_excludes_hole() {
        let mut outer = square("NSW", 0.0, 0.0, 10.0);
        let hole = square("ACT", 4.0, 4.0, 2.0).polygons.remove(0).remove(0);
        outer.polygons[0].push(hole);
        assert!(outer.contains(1.0, 1.0));
        assert!(!outer.contains(5.0, 5.0));
        assert!(!outer.contains(11.0, 5.0));
    }

    #[test]
    fn bounds_cover_all_points() {
        let (min, max) = square("TAS", -2.0, 3.0, 4.0).bounds().unwrap();
        assert_eq!(min, DVec2::new(-2.0, 3.0));
        assert_eq!(max, DVec2::new(2.0, 7.0));
    }
}
