//! Public types for the visualization module.

use serde::Deserialize;
use std::path::PathBuf;

/// Legend placement options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendMode {
    /// Overlay legend in the upper-left corner of the plotting area (may overlap data).
    #[default]
    Inside,
    /// Separate, non-overlapping legend panel on the right side.
    Right,
}

/// Output options shared by the chart renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub legend: LegendMode,
    pub title: String,
    /// Font file for chart text; system fonts are searched when `None`.
    pub font_path: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            legend: LegendMode::default(),
            title: String::new(),
            font_path: None,
        }
    }
}

impl RenderOptions {
    pub fn from_config(cfg: &crate::config::ChartConfig) -> Self {
        Self {
            width: cfg.width,
            height: cfg.height,
            legend: cfg.legend,
            title: String::new(),
            font_path: cfg.font_path.clone(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
