use super::ChartGeometry;
use std::time::{Duration, Instant};

/// A chart slot whose contents are fully replaced on every rebuild, so
/// nothing from a previous selection survives.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    pub geometry: Option<ChartGeometry>,
    started: Instant,
}

impl ChartPanel {
    pub fn new() -> Self {
        Self {
            geometry: None,
            started: Instant::now(),
        }
    }

    /// Replace the chart and restart its enter animations
    pub fn rebuild(&mut self, geometry: ChartGeometry) {
        self.geometry = Some(geometry);
        self.started = Instant::now();
    }

    pub fn shape_count(&self) -> usize {
        self.geometry.as_ref().map_or(0, ChartGeometry::shape_count)
    }

    /// Time since the last rebuild
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether anything in the panel is still moving
    pub fn is_animating(&self) -> bool {
        self.geometry
            .as_ref()
            .is_some_and(|g| self.elapsed() < g.settled_after())
    }
}

impl Default for ChartPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{build_expenditure_chart, ENTER_MS};
    use crate::model::{ChartDatum, ExpenditureSeries};

    fn series(n: usize) -> ExpenditureSeries {
        ExpenditureSeries {
            country: "Australia".to_string(),
            data: (0..n)
                .map(|i| ChartDatum::new(format!("{}", 2019 + i), 1000.0 * (i + 1) as f64))
                .collect(),
        }
    }

    #[test]
    fn rebuild_replaces_all_shapes() {
        let mut panel = ChartPanel::new();
        assert_eq!(panel.shape_count(), 0);
        panel.rebuild(build_expenditure_chart(&series(4)));
        assert_eq!(panel.shape_count(), 4);
        panel.rebuild(build_expenditure_chart(&series(2)));
        assert_eq!(panel.shape_count(), 2);
    }

    #[test]
    fn fresh_rebuild_is_animating() {
        let mut panel = ChartPanel::new();
        assert!(!panel.is_animating());
        panel.rebuild(build_expenditure_chart(&series(4)));
        assert!(panel.is_animating());
        assert!(panel.elapsed() < Duration::from_millis(ENTER_MS));
    }
}
