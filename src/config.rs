use crate::error::ConfigError;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Command line flags. Anything given here wins over the config file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding all four datasets (keeps their file names)
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Country record used by the expenditure chart
    #[arg(long)]
    pub country: Option<String>,

    /// Log file (the terminal is owned by the UI)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub deaths_csv: PathBuf,
    pub vaccination_csv: PathBuf,
    pub boundaries: PathBuf,
    pub expenditure_json: PathBuf,
    pub country: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            deaths_csv: PathBuf::from("data/deaths.csv"),
            vaccination_csv: PathBuf::from("data/vaccination.csv"),
            boundaries: PathBuf::from("data/aus.json"),
            expenditure_json: PathBuf::from("data/healthExpenditure.json"),
            country: "Australia".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("aus-covid-map.log"),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the effective configuration: file (if any), then CLI overrides.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        Ok(config)
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.data_dir {
            let data = &mut self.data;
            for path in [
                &mut data.deaths_csv,
                &mut data.vaccination_csv,
                &mut data.boundaries,
                &mut data.expenditure_json,
            ] {
                if let Some(name) = path.file_name() {
                    *path = dir.join(name);
                }
            }
        }
        if let Some(country) = &cli.country {
            self.data.country = country.clone();
        }
        if let Some(file) = &cli.log_file {
            self.log.file = file.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [data]
            country = "New Zealand"
            "#,
        )
        .unwrap();
        assert_eq!(config.data.country, "New Zealand");
        assert_eq!(config.data.deaths_csv, PathBuf::from("data/deaths.csv"));
        assert_eq!(config.log.file, PathBuf::from("aus-covid-map.log"));
    }

    #[test]
    fn bad_toml_is_reported() {
        assert!(matches!(
            AppConfig::from_toml("[data\ncountry = 1"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn data_dir_override_rewrites_every_dataset() {
        let cli = Cli::parse_from(["aus-covid-map", "--data-dir", "/srv/covid", "--country", "Canada"]);
        let config = AppConfig::resolve(&cli).unwrap();
        assert_eq!(config.data.deaths_csv, PathBuf::from("/srv/covid/deaths.csv"));
        assert_eq!(config.data.boundaries, PathBuf::from("/srv/covid/aus.json"));
        assert_eq!(
            config.data.expenditure_json,
            PathBuf::from("/srv/covid/healthExpenditure.json")
        );
        assert_eq!(config.data.country, "Canada");
        assert_eq!(cli.log_level, tracing::Level::INFO);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = AppConfig::load_from_file(Path::new("/nonexistent/aus.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
