use super::{build_chart, AxisPolicy, ChartGeometry, ChartSpec, MarkKind, Timing};
use crate::format;
use crate::model::{ChartDatum, ExpenditureSeries};

/// Health expenditure bars for one country
pub fn build_expenditure_chart(series: &ExpenditureSeries) -> ChartGeometry {
    build_chart(
        ChartSpec {
            title: "Health Expenditure Trend".to_string(),
            subtitle: series.country.clone(),
            kind: MarkKind::Bar,
            policy: AxisPolicy::Headroom(1.1),
            padding: 0.3,
            ticks: 5,
            value_label: format::aud_millions,
            tick_label: |v, _| format::tick_currency(v),
            y_caption: Some("Expenditure (Million AUD)".to_string()),
            timing: Timing {
                mark_stagger: 0,
                label_delay: 0,
                label_stagger: 100,
                label_rises: true,
                line: None,
            },
        },
        &series.data,
    )
}

/// Tooltip lines for a hovered expenditure bar
pub fn expenditure_tooltip(datum: &ChartDatum) -> Vec<String> {
    vec![
        datum.label.clone(),
        format::aud_millions(datum.value),
        format!("{} million", format::thousands(datum.value, 0)),
    ]
}
