//! Chart geometry, computed without any terminal. Positions live in a unit
//! box: `x` in `[0, 1]` left to right, `y` in `[0, 1]` bottom to top. The UI
//! layer maps the box onto braille pixels.

mod detail;
mod expenditure;
mod panel;

pub use detail::{build_detail_charts, national_series, AxisPolicy, DataSource, DetailCharts};
pub use expenditure::{build_expenditure_chart, expenditure_tooltip};
pub use panel::ChartPanel;

use crate::model::ChartDatum;
use crate::scale::{BandScale, LinearScale};
use std::time::Duration;

/// Length of every enter animation
pub const ENTER_MS: u64 = 800;

/// Quadratic ease-in-out over `t` in `[0, 1]`
pub fn ease_quad_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t / 2.0
    } else {
        let t = t - 1.0;
        (t * (2.0 - t) + 1.0) / 2.0
    }
}

/// A delayed, eased animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub delay: Duration,
    pub duration: Duration,
}

impl Transition {
    pub fn new(delay_ms: u64, duration_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            duration: Duration::from_millis(duration_ms),
        }
    }

    /// Eased progress in `[0, 1]` after `elapsed`
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let Some(t) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        ease_quad_in_out(t.as_secs_f64() / self.duration.as_secs_f64())
    }

    /// Time at which the transition is complete
    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Bar,
    Dot,
}

/// One bound shape: a bar or a dot, with its value label
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub datum: ChartDatum,
    /// Left edge of the band
    pub x: f64,
    pub width: f64,
    /// Scaled value (0 = baseline, 1 = top of the axis)
    pub y: f64,
    pub label: String,
    pub enter: Transition,
    pub label_enter: Transition,
    /// Label rises from the baseline instead of appearing in place
    pub label_rises: bool,
}

impl Mark {
    pub fn center(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Current top of the bar / height of the dot
    pub fn animated_y(&self, elapsed: Duration) -> f64 {
        self.y * self.enter.progress(elapsed)
    }

    /// Labels fade in; treat them as visible once half opaque
    pub fn label_visible(&self, elapsed: Duration) -> bool {
        self.label_enter.progress(elapsed) >= 0.5
    }

    pub fn label_y(&self, elapsed: Duration) -> f64 {
        if self.label_rises {
            self.y * self.label_enter.progress(elapsed)
        } else {
            self.y
        }
    }
}

/// Axis tick at a unit-box position
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub pos: f64,
    pub label: String,
}

/// Fully computed chart, ready to be painted
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub title: String,
    pub subtitle: String,
    pub kind: MarkKind,
    pub marks: Vec<Mark>,
    /// Connecting line through the marks and its draw-in animation
    pub line: Option<Transition>,
    pub y_ticks: Vec<Tick>,
    pub x_ticks: Vec<Tick>,
    pub y_max: f64,
    pub y_caption: Option<String>,
}

impl ChartGeometry {
    /// Number of data-bound shapes
    pub fn shape_count(&self) -> usize {
        self.marks.len()
    }

    /// Index of the bar whose band contains unit-box `x`
    pub fn mark_at(&self, x: f64) -> Option<usize> {
        self.marks
            .iter()
            .position(|m| x >= m.x && x <= m.x + m.width)
    }

    /// Time after which nothing animates any more
    pub fn settled_after(&self) -> Duration {
        self.marks
            .iter()
            .flat_map(|m| [m.enter.end(), m.label_enter.end()])
            .chain(self.line.map(|l| l.end()))
            .max()
            .unwrap_or_default()
    }
}

/// How a chart staggers its enter animations (milliseconds)
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Per-index delay of the marks
    pub mark_stagger: u64,
    /// Base delay of the labels, plus `label_stagger` per index
    pub label_delay: u64,
    pub label_stagger: u64,
    pub label_rises: bool,
    pub line: Option<Transition>,
}

/// Everything that distinguishes one chart from another
pub struct ChartSpec {
    pub title: String,
    pub subtitle: String,
    pub kind: MarkKind,
    pub policy: AxisPolicy,
    pub padding: f64,
    pub ticks: usize,
    pub value_label: fn(f64) -> String,
    pub tick_label: fn(f64, f64) -> String,
    pub y_caption: Option<String>,
    pub timing: Timing,
}

/// Bind `data` to marks on a band x-axis and linear y-axis
pub fn build_chart(spec: ChartSpec, data: &[ChartDatum]) -> ChartGeometry {
    let labels: Vec<&str> = data.iter().map(|d| d.label.as_str()).collect();
    let band = BandScale::new(&labels, (0.0, 1.0), spec.padding);
    let values: Vec<f64> = data.iter().map(|d| d.value).collect();
    let y_max = spec.policy.upper_bound(&values);
    let y = LinearScale::new((0.0, y_max), (0.0, 1.0));
    let timing = spec.timing;

    let marks = data
        .iter()
        .enumerate()
        .map(|(i, datum)| {
            let i = i as u64;
            Mark {
                datum: datum.clone(),
                x: band.position(&datum.label).unwrap_or(0.0),
                width: band.bandwidth(),
                y: y.apply(datum.value).clamp(0.0, 1.0),
                label: (spec.value_label)(datum.value),
                enter: Transition::new(i * timing.mark_stagger, ENTER_MS),
                label_enter: Transition::new(
                    timing.label_delay + i * timing.label_stagger,
                    ENTER_MS,
                ),
                label_rises: timing.label_rises,
            }
        })
        .collect();

    let step = y.tick_step(spec.ticks);
    let y_ticks = y
        .ticks(spec.ticks)
        .into_iter()
        .map(|v| Tick {
            pos: y.apply(v),
            label: (spec.tick_label)(v, step),
        })
        .collect();
    let x_ticks = data
        .iter()
        .filter_map(|d| {
            band.center(&d.label).map(|pos| Tick {
                pos,
                label: d.label.clone(),
            })
        })
        .collect();

    ChartGeometry {
        title: spec.title,
        subtitle: spec.subtitle,
        kind: spec.kind,
        marks,
        line: timing.line,
        y_ticks,
        x_ticks,
        y_max,
        y_caption: spec.y_caption,
    }
}
