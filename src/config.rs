//! Configuration
//!
//! Loaded from a TOML file (explicit path, else `<config dir>/epiviz/config.toml` when it
//! exists, else built-in defaults), then overridden by environment variables:
//!
//! - `EPIVIZ_API_URL`: base URL of the prediction API
//! - `EPIVIZ_FONT`: path to a TTF/OTF font used for chart text
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! timeout_secs = 30
//!
//! [chart]
//! width = 1000
//! height = 600
//! legend = "inside"
//!
//! [map]
//! top = 20
//! ```

use crate::error::{Error, Result};
use crate::viz::LegendMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub map: MapConfig,
}

/// Prediction API connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

/// Line chart output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default)]
    pub legend: LegendMode,

    /// Font file for chart text; system fonts are searched when unset.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

fn default_width() -> u32 {
    1000
}

fn default_height() -> u32 {
    600
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            legend: LegendMode::default(),
            font_path: None,
        }
    }
}

/// Map (heat ranking) settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    /// How many areas the heat ranking shows.
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    20
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { top: default_top() }
    }
}

impl Config {
    /// Default config file location, `<config dir>/epiviz/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("epiviz").join("config.toml"))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Load from `path`, or the default location if present, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => {
                    log::debug!("loading config from {}", p.display());
                    Self::from_file(&p)?
                }
                None => Self::default(),
            },
        };
        cfg.apply_overrides(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    /// Apply `EPIVIZ_*` overrides looked up through `get`.
    pub fn apply_overrides<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = get("EPIVIZ_API_URL").filter(|s| !s.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(font) = get("EPIVIZ_FONT").filter(|s| !s.trim().is_empty()) {
            self.chart.font_path = Some(PathBuf::from(font));
        }
    }
}
