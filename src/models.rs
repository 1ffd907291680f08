use crate::error::{Error, Result};
use crate::style::Rgb8;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether plotted values are running totals or day-over-day changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    #[default]
    Cumulative,
    Delta,
}

/// Y-axis scale of the line chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YScale {
    #[default]
    Linear,
    Log,
}

/// A geographic region as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    /// Region code used as the map id (e.g. `"US"`, `"US-CA"`).
    #[serde(alias = "iso_2", default)]
    pub iso_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Area {
    pub fn new(iso_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            iso_code: iso_code.into(),
            name: name.into(),
            country: None,
            state: None,
        }
    }

    /// Human-readable label: `name` when present, else `"country / state"` or `"country"`.
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            return self.name.clone();
        }
        match (self.country.as_deref(), self.state.as_deref()) {
            (Some(c), Some(s)) if !s.trim().is_empty() => format!("{c} / {s}"),
            (Some(c), _) => c.to_string(),
            _ => self.iso_code.clone(),
        }
    }

    /// True for states and provinces, false for whole countries.
    pub fn is_subdivision(&self) -> bool {
        self.state.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

/// Cumulative count on a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    #[serde(deserialize_with = "de_f64_from_string_or_number")]
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Serde helper: the API encodes some counts as strings (decimal fields), others as numbers.
fn de_f64_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = f64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number or a numeric string")
        }

        fn visit_f64<E>(self, v: f64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_str<E>(self, s: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<f64>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

/// A forecasting model known to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One predicted time series for an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub model: Model,
    /// Whether the model assumed continued social distancing.
    #[serde(default)]
    pub distancing: bool,
    #[serde(default)]
    pub time_series: Vec<Observation>,
}

/// Observed history plus zero or more predictions for one area (predict endpoint).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaForecast {
    #[serde(default)]
    pub observed: Vec<Observation>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// Latest (or predicted) cumulative total for one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeEntry {
    pub area: Area,
    #[serde(deserialize_with = "de_f64_from_string_or_number")]
    pub value: f64,
}

/// A transformed point, ready for the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One line of the chart. Points are in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub id: String,
    pub points: Vec<PlotPoint>,
    pub color: Rgb8,
    pub predicted: bool,
    pub distancing: bool,
}

/// Choropleth entry: `value` drives the fill color, `value_true` is what the tooltip shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatEntry {
    pub id: String,
    pub value: f64,
    pub value_true: f64,
    pub area: Area,
}

/// Parse a `YYYY-MM-DD` date string into a calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}
