//! epiviz_rs
//!
//! A Rust library for fetching, shaping, visualizing, and exporting observed and
//! predicted epidemic case counts. Pairs with the `epiviz` CLI.
//!
//! ### Features
//! - Fetch areas, models, cumulative totals and per-area forecasts from a prediction API
//! - Shape observed and predicted series for charting (cumulative or daily delta, linear or log)
//! - Derive Y/X axis configuration (log ticks, weekly vs. monthly date ticks)
//! - Map cumulative totals to a log heat scale with color ramp and tooltips
//! - Render SVG/PNG line charts and heat rankings; export CSV or JSON
//!
//! ### Example
//! ```no_run
//! use epiviz_rs::api::{self, Client, DataSource};
//! use epiviz_rs::config::Config;
//! use epiviz_rs::models::{Statistic, YScale};
//! use epiviz_rs::viz::{self, RenderOptions};
//!
//! let cfg = Config::load(None)?;
//! let client = Client::from_config(&cfg.api)?;
//! let areas = api::resolve_areas(&client.areas()?, &["Italy".to_string(), "US".to_string()])?;
//! let forecasts = api::fetch_forecasts(&client, &areas, &["SIR".to_string()], 14, None)?;
//! let chart = epiviz_rs::build_chart(&forecasts, Statistic::Delta, YScale::Log);
//! epiviz_rs::storage::save_series_csv(&chart.series, "series.csv")?;
//! viz::plot_forecast(&chart, "forecast.svg", &RenderOptions::from_config(&cfg.chart))?;
//! # Ok::<(), epiviz_rs::Error>(())
//! ```

pub mod api;
pub mod axis;
pub mod config;
pub mod error;
pub mod heatmap;
pub mod models;
pub mod stats;
pub mod storage;
pub mod style;
pub mod transform;
pub mod view;
pub mod viz;

pub use api::{Client, DataSource};
pub use error::{Error, Result};
pub use heatmap::HeatLayer;
pub use models::{
    Area, AreaForecast, CumulativeEntry, HeatEntry, Model, Observation, PlotPoint, PlotSeries,
    Prediction, Statistic, YScale,
};
pub use transform::{ChartData, build_chart};
