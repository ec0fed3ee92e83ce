use super::{build_chart, ChartGeometry, ChartSpec, MarkKind, Timing, Transition, ENTER_MS};
use crate::data::regions;
use crate::format;
use crate::model::{ChartDatum, MortalityDataset, RegionRecord, SelectionState, YEARS};
use crate::scale::LinearScale;

const REGION_DEATHS_MAX: f64 = 4000.0;
const NATIONAL_DEATHS_MAX: f64 = 11000.0;
/// Summed rows are halved for the national view
const NATIONAL_DIVISOR: f64 = 2.0;
const VACCINATION_HEADROOM: f64 = 1.15;
const PADDING: f64 = 0.35;

/// Where the detail charts take their values from
#[derive(Debug, Clone, Copy)]
pub enum DataSource<'a> {
    National,
    Region(&'a RegionRecord),
    /// Selected on the map but absent from the datasets
    Missing { code: &'a str },
}

impl<'a> DataSource<'a> {
    pub fn from_selection(dataset: &'a MortalityDataset, selection: &'a SelectionState) -> Self {
        match selection.selected() {
            None => DataSource::National,
            Some(code) => match dataset.record(code) {
                Some(record) => DataSource::Region(record),
                None => DataSource::Missing { code },
            },
        }
    }

    fn subtitle(&self, dataset: &MortalityDataset) -> String {
        match self {
            DataSource::National => "Australia".to_string(),
            DataSource::Region(record) => record.name.clone(),
            DataSource::Missing { code } => {
                let name = dataset
                    .shapes
                    .iter()
                    .find(|s| s.code == *code)
                    .map(|s| s.name.as_str())
                    .or_else(|| regions::name_for_code(code))
                    .unwrap_or(*code);
                format!("{name} (no data)")
            }
        }
    }

    fn deaths_policy(&self) -> AxisPolicy {
        match self {
            DataSource::National => AxisPolicy::Fixed(NATIONAL_DEATHS_MAX),
            _ => AxisPolicy::Fixed(REGION_DEATHS_MAX),
        }
    }
}

/// How the vertical domain's upper bound is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisPolicy {
    Fixed(f64),
    /// `max * factor`, or 1 when everything is zero
    Headroom(f64),
    /// `max * factor` rounded up to the next half unit, then niced
    RoundedHeadroom(f64),
}

impl AxisPolicy {
    pub fn upper_bound(&self, values: &[f64]) -> f64 {
        let max = values.iter().copied().fold(0.0, f64::max);
        match *self {
            AxisPolicy::Fixed(upper) => upper,
            AxisPolicy::Headroom(factor) => {
                if max == 0.0 {
                    1.0
                } else {
                    max * factor
                }
            }
            AxisPolicy::RoundedHeadroom(factor) => {
                let raw = if max == 0.0 { 1.0 } else { max * factor };
                let rounded = (raw * 2.0).ceil() / 2.0;
                LinearScale::new((0.0, rounded), (0.0, 1.0)).nice().domain.1
            }
        }
    }
}

/// Deaths and vaccinations (in millions) for the national aggregate:
/// every row summed per year, then halved.
pub fn national_series(dataset: &MortalityDataset) -> ([f64; 4], [f64; 4]) {
    let mut deaths = [0.0; 4];
    let mut vaccinations = [0.0; 4];
    for row in &dataset.death_rows {
        for (acc, v) in deaths.iter_mut().zip(row.values) {
            *acc += v;
        }
    }
    for row in &dataset.vaccination_rows {
        for (acc, v) in vaccinations.iter_mut().zip(row.values) {
            *acc += v;
        }
    }
    (
        deaths.map(|v| v / NATIONAL_DIVISOR),
        vaccinations.map(|v| v / (NATIONAL_DIVISOR * 1_000_000.0)),
    )
}

fn series(source: &DataSource, dataset: &MortalityDataset) -> ([f64; 4], [f64; 4]) {
    match source {
        DataSource::National => national_series(dataset),
        DataSource::Region(record) => (
            record.deaths,
            record
                .vaccinations
                .unwrap_or([0.0; 4])
                .map(|v| v / 1_000_000.0),
        ),
        DataSource::Missing { .. } => ([0.0; 4], [0.0; 4]),
    }
}

fn to_data(values: [f64; 4]) -> Vec<ChartDatum> {
    YEARS
        .iter()
        .zip(values)
        .map(|(&year, value)| ChartDatum::new(year, value))
        .collect()
}

/// The two linked charts for the current selection
#[derive(Debug, Clone, PartialEq)]
pub struct DetailCharts {
    pub deaths: ChartGeometry,
    pub vaccinations: ChartGeometry,
}

/// Build both detail charts from scratch for `selection`
pub fn build_detail_charts(dataset: &MortalityDataset, selection: &SelectionState) -> DetailCharts {
    let source = DataSource::from_selection(dataset, selection);
    let subtitle = source.subtitle(dataset);
    let (deaths, vaccinations) = series(&source, dataset);

    let deaths = build_chart(
        ChartSpec {
            title: "COVID-19 Deaths".to_string(),
            subtitle: subtitle.clone(),
            kind: MarkKind::Bar,
            policy: source.deaths_policy(),
            padding: PADDING,
            ticks: 5,
            value_label: format::count,
            tick_label: format::tick,
            y_caption: None,
            timing: Timing {
                mark_stagger: 100,
                label_delay: 400,
                label_stagger: 100,
                label_rises: false,
                line: None,
            },
        },
        &to_data(deaths),
    );

    let vaccinations = build_chart(
        ChartSpec {
            title: "Vaccinations".to_string(),
            subtitle,
            kind: MarkKind::Dot,
            policy: AxisPolicy::RoundedHeadroom(VACCINATION_HEADROOM),
            padding: PADDING,
            ticks: 5,
            value_label: |v| format!("{v:.1}M"),
            tick_label: format::tick,
            y_caption: None,
            timing: Timing {
                mark_stagger: 100,
                label_delay: 0,
                label_stagger: 100,
                label_rises: false,
                line: Some(Transition::new(500, ENTER_MS)),
            },
        },
        &to_data(vaccinations),
    );

    DetailCharts {
        deaths,
        vaccinations,
    }
}
