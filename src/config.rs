use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::chart::LineChartSpec;
use crate::data::model::ColumnMapping;

pub const APP_NAME: &str = "genre-explorer";

/// Manages the config directory and the config file inside it.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?
            .join(app_name);
        Ok(Self { config_dir })
    }

    /// Path of the main config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Default configuration as TOML, with a short header.
    pub fn generate_default_config(&self) -> Result<String> {
        let body = toml::to_string_pretty(&AppConfig::default())
            .context("serializing default config")?;
        Ok(format!(
            "# {APP_NAME} configuration file\n# This file uses TOML format. See https://toml.io/ for syntax reference.\n\n{body}"
        ))
    }

    /// Write the default config file, creating the directory if needed.
    /// Refuses to overwrite an existing file.
    pub fn write_default_config(&self) -> Result<PathBuf> {
        let path = self.config_file();
        if path.exists() {
            bail!("Config file already exists at {}", path.display());
        }
        std::fs::create_dir_all(&self.config_dir)
            .with_context(|| format!("creating {}", self.config_dir.display()))?;
        std::fs::write(&path, self.generate_default_config()?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page heading.
    pub title: String,
    /// Text shown under the heading.
    pub description: String,
    /// Dataset opened on startup.
    pub data_path: PathBuf,
    /// Keep the loaded dataset in memory between pipeline runs.
    pub cache_dataset: bool,
    /// Genres selected on startup (ignored when absent from the data).
    pub default_categories: Vec<String>,
    /// Year range selected on startup, clamped to the data.
    pub default_year_range: (i64, i64),
    pub columns: ColumnMapping,
    pub chart: LineChartSpec,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Movies dataset".to_string(),
            description: "Gross earnings per genre and year. Pick genres and a year range to \
                          reshape the table and chart."
                .to_string(),
            data_path: PathBuf::from("data/movies_genres_summary.csv"),
            cache_dataset: true,
            default_categories: vec!["Action".to_string(), "Adventure".to_string()],
            default_year_range: (2000, 2016),
            columns: ColumnMapping::default(),
            chart: LineChartSpec::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path` if given, otherwise from the user config directory.
    /// A missing user config file means defaults; a missing explicit file is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match ConfigManager::new(APP_NAME) {
                Ok(m) => (m.config_file(), false),
                Err(e) => {
                    log::warn!("{e}; using default configuration");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() && !required {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let cols = &self.columns;
        for (field, name) in [("category", &cols.category), ("year", &cols.year), ("value", &cols.value)] {
            if name.trim().is_empty() {
                bail!("columns.{field} must not be empty");
            }
        }
        if cols.category == cols.year || cols.category == cols.value || cols.year == cols.value {
            bail!("columns.category, columns.year and columns.value must be distinct");
        }
        if !(self.chart.height.is_finite() && self.chart.height > 0.0) {
            bail!("chart.height must be positive, got {}", self.chart.height);
        }
        Ok(())
    }
}
