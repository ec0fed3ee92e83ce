pub mod regions;

use crate::config::DataConfig;
use crate::error::{DataError, Result};
use crate::model::{
    ChartDatum, ExpenditureSeries, MortalityDataset, RegionRecord, RegionShape, RegionTotalsIndex,
    YearlyRow, CURRENT_YEAR, EXPENDITURE_YEARS, YEARS,
};
use csv::{ReaderBuilder, Trim};
use geojson::{GeoJson, Geometry, Value};
use glam::DVec2;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;

const REGION_COLUMN: &str = "States";
const TOTAL_COLUMN: &str = "Total";

/// Outcome of the startup load, one result per view.
pub struct LoadedViews {
    pub mortality: Result<MortalityDataset>,
    pub expenditure: Result<ExpenditureSeries>,
}

/// Read all four sources in parallel and build each view's data model once
/// its sources have resolved. A view with any failed source stays unloaded.
pub fn load_views(config: &DataConfig) -> LoadedViews {
    let ((deaths, vaccinations), (shapes, expenditure)) = rayon::join(
        || {
            rayon::join(
                || load_yearly_csv(&config.deaths_csv, Some(TOTAL_COLUMN)),
                || load_yearly_csv(&config.vaccination_csv, None),
            )
        },
        || {
            rayon::join(
                || load_boundaries(&config.boundaries),
                || load_expenditure(&config.expenditure_json, &config.country),
            )
        },
    );

    let failed = failed_sources(&[
        ("deaths", deaths.as_ref().err()),
        ("vaccinations", vaccinations.as_ref().err()),
        ("boundaries", shapes.as_ref().err()),
    ]);
    for (source, error) in &failed {
        tracing::error!(source = *source, error = %error, "mortality source failed");
    }

    let mortality = deaths.and_then(|deaths| {
        let vaccinations = vaccinations?;
        let shapes = shapes?;
        Ok(join_mortality(deaths, vaccinations, shapes))
    });
    if mortality.is_err() {
        tracing::error!(failed = failed.len(), "mortality view not loaded");
    }
    if let Err(e) = &expenditure {
        tracing::error!(error = %error_chain(e), "expenditure view not loaded");
    }

    LoadedViews {
        mortality,
        expenditure,
    }
}

/// Every failed source with its full error chain, in the order given
fn failed_sources(
    results: &[(&'static str, Option<&DataError>)],
) -> Vec<(&'static str, String)> {
    results
        .iter()
        .filter_map(|&(source, err)| err.map(|e| (source, error_chain(e))))
        .collect()
}

/// Render an error with its sources, `a: b: c`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// A CSV row keyed by region with year columns, plus the optional total column.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub row: YearlyRow,
    pub total: Option<f64>,
}

/// Load a `States,<years...>` table. Region keys are normalized to codes.
pub fn load_yearly_csv(path: &Path, total_column: Option<&str>) -> Result<Vec<CsvRow>> {
    let file = File::open(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(file);
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };

    let key_idx = column(REGION_COLUMN)?;
    let year_idx = YEARS.map(column);
    let mut year_cols = [0usize; 4];
    for (slot, idx) in year_cols.iter_mut().zip(year_idx) {
        *slot = idx?;
    }
    let total_idx = total_column.map(column).transpose()?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        let key = record.get(key_idx).unwrap_or("");
        if key.is_empty() {
            continue;
        }
        let key = regions::normalize_key(key);

        let mut values = [0.0; 4];
        for (value, (&idx, year)) in values.iter_mut().zip(year_cols.iter().zip(YEARS)) {
            *value = coerce_number(record.get(idx).unwrap_or(""), &key, year);
        }
        let total = total_idx.map(|idx| {
            coerce_number(record.get(idx).unwrap_or(""), &key, TOTAL_COLUMN)
        });

        rows.push(CsvRow {
            row: YearlyRow { key, values },
            total,
        });
    }

    tracing::info!(path = %path.display(), rows = rows.len(), "loaded table");
    Ok(rows)
}

/// Basic numeric coercion: thousands separators are ignored, anything
/// unparsable counts as zero.
pub fn coerce_number(raw: &str, region: &str, column: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|&c| c != ',' && c != ' ').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            tracing::warn!(region, column, raw, "non-numeric cell treated as 0");
            0.0
        }
    }
}

/// Load the state boundary FeatureCollection.
pub fn load_boundaries(path: &Path) -> Result<Vec<RegionShape>> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson = content.parse().map_err(|e| DataError::GeoJson {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(DataError::NotFeatureCollection {
                path: path.to_path_buf(),
            })
        }
    };

    let mut shapes = Vec::new();
    for feature in &collection.features {
        let name = feature
            .property("name")
            .or_else(|| feature.property("STATE_NAME"))
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        if name.is_empty() {
            tracing::debug!("skipping unnamed feature");
            continue;
        }

        let polygons = match &feature.geometry {
            Some(geometry) => geometry_polygons(geometry),
            None => Vec::new(),
        };
        if polygons.is_empty() {
            tracing::debug!(name = %name, "skipping feature without polygon geometry");
            continue;
        }

        let code = match regions::code_for_name(&name) {
            Some(code) => code.to_string(),
            None => {
                tracing::warn!(name = %name, "no short code for region, using its name");
                name.clone()
            }
        };
        shapes.push(RegionShape {
            code,
            name,
            polygons,
        });
    }

    if shapes.is_empty() {
        return Err(DataError::EmptyBoundaries {
            path: path.to_path_buf(),
        });
    }
    tracing::info!(path = %path.display(), regions = shapes.len(), "loaded boundaries");
    Ok(shapes)
}

fn geometry_polygons(geometry: &Geometry) -> Vec<Vec<Vec<DVec2>>> {
    let to_rings = |rings: &Vec<Vec<Vec<f64>>>| -> Vec<Vec<DVec2>> {
        rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .filter(|c| c.len() >= 2)
                    .map(|c| DVec2::new(c[0], c[1]))
                    .collect()
            })
            .collect()
    };

    match &geometry.value {
        Value::Polygon(rings) => vec![to_rings(rings)],
        Value::MultiPolygon(polygons) => polygons.iter().map(to_rings).collect(),
        Value::GeometryCollection(geometries) => {
            geometries.iter().flat_map(geometry_polygons).collect()
        }
        _ => Vec::new(),
    }
}

#[derive(Deserialize)]
struct ExpenditureRecord {
    #[serde(rename = "Country")]
    country: String,
    #[serde(flatten)]
    fields: HashMap<String, FieldValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl FieldValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().replace(',', "").parse().ok(),
            FieldValue::Other(_) => None,
        }
    }
}

/// Load the per-country expenditure array and keep one country's series.
pub fn load_expenditure(path: &Path, country: &str) -> Result<ExpenditureSeries> {
    let mut bytes = fs::read(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<ExpenditureRecord> =
        simd_json::serde::from_slice(&mut bytes).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let record = records
        .iter()
        .find(|r| r.country == country)
        .ok_or_else(|| DataError::MissingCountry {
            path: path.to_path_buf(),
            country: country.to_string(),
        })?;

    let data = EXPENDITURE_YEARS
        .iter()
        .map(|&year| {
            let value = record
                .fields
                .get(year)
                .and_then(FieldValue::as_number)
                .unwrap_or_else(|| {
                    tracing::warn!(country, year, "missing expenditure value treated as 0");
                    0.0
                });
            ChartDatum::new(year, value)
        })
        .collect();

    tracing::info!(path = %path.display(), country, "loaded expenditure");
    Ok(ExpenditureSeries {
        country: country.to_string(),
        data,
    })
}

/// Join deaths and vaccinations by region code and build the totals index.
pub fn join_mortality(
    deaths: Vec<CsvRow>,
    vaccinations: Vec<CsvRow>,
    shapes: Vec<RegionShape>,
) -> MortalityDataset {
    let vaccination_by_key: HashMap<&str, &YearlyRow> = vaccinations
        .iter()
        .map(|r| (r.row.key.as_str(), &r.row))
        .collect();
    let current = YEARS
        .iter()
        .position(|&y| y == CURRENT_YEAR)
        .unwrap_or(YEARS.len() - 1);

    let mut death_totals = HashMap::new();
    let mut records = Vec::with_capacity(deaths.len());
    for CsvRow { row, total } in &deaths {
        let death_total = total.unwrap_or_else(|| row.values.iter().sum());
        death_totals.insert(row.key.clone(), death_total);
        records.push(RegionRecord {
            code: row.key.clone(),
            name: regions::name_for_code(&row.key)
                .unwrap_or(row.key.as_str())
                .to_string(),
            deaths: row.values,
            death_total,
            vaccinations: vaccination_by_key.get(row.key.as_str()).map(|v| v.values),
        });
    }

    let vaccination_totals: HashMap<String, f64> = vaccinations
        .iter()
        .map(|r| (r.row.key.clone(), r.row.values[current]))
        .collect();

    for shape in &shapes {
        if !death_totals.contains_key(&shape.code) {
            tracing::warn!(region = %shape.code, "no death total, shown as no data");
        }
        if !vaccination_totals.contains_key(&shape.code) {
            tracing::warn!(region = %shape.code, "no vaccination total");
        }
    }

    MortalityDataset {
        records,
        death_rows: deaths.into_iter().map(|r| r.row).collect(),
        vaccination_rows: vaccinations.into_iter().map(|r| r.row).collect(),
        totals: RegionTotalsIndex::new(death_totals, vaccination_totals),
        shapes,
    }
}
