use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or joining one of the dashboard datasets.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Malformed GeoJSON in {path}")]
    GeoJson {
        path: PathBuf,
        #[source]
        source: Box<geojson::Error>,
    },

    #[error("{path} must be a FeatureCollection")]
    NotFeatureCollection { path: PathBuf },

    #[error("No polygon features found in {path}")]
    EmptyBoundaries { path: PathBuf },

    #[error("Malformed JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: simd_json::Error,
    },

    #[error("Country '{country}' not present in {path}")]
    MissingCountry { path: PathBuf, country: String },
}

/// Failures while loading the optional TOML configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn read_error_keeps_path_and_source() {
        let err = DataError::Read {
            path: PathBuf::from("data/deaths.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Failed to read data/deaths.csv");
        assert!(err.source().is_some());
    }

    #[test]
    fn missing_column_names_both() {
        let err = DataError::MissingColumn {
            path: PathBuf::from("v.csv"),
            column: "States".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'States' not found in v.csv");
    }
}
