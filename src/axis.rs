//! Axis configuration: legend text, tick values and bounds for the Y axis, tick
//! granularity and label formats for the date axis.

use crate::models::{PlotSeries, Statistic, YScale};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Offset of the Y-axis legend from the axis line (negative = left of it).
pub const Y_LEGEND_OFFSET: i32 = -60;
/// Offset of the X-axis legend below the axis line.
pub const X_LEGEND_OFFSET: i32 = 36;
/// Date spans longer than this switch the X axis from weekly to monthly ticks.
pub const MONTHLY_TICKS_AFTER_DAYS: i64 = 150;

/// Y-axis domain as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum YDomain {
    /// Bounds fitted to the data by the renderer.
    Linear,
    /// Explicit bounds; log axes cannot be auto-fitted reliably.
    Log { base: u32, min: f64, max: f64 },
}

/// Y-axis display parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxisConfig {
    pub legend: &'static str,
    pub legend_offset: i32,
    /// Explicit tick values (log scale only).
    pub tick_values: Option<Vec<f64>>,
    /// Horizontal grid lines (log scale only; same as the ticks).
    pub grid_values: Option<Vec<f64>>,
    pub domain: YDomain,
}

impl YAxisConfig {
    pub fn is_log(&self) -> bool {
        matches!(self.domain, YDomain::Log { .. })
    }
}

/// Date-axis tick spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickGranularity {
    Weekly,
    Monthly,
}

impl TickGranularity {
    /// Approximate number of ticks needed to cover `span_days`.
    pub fn tick_count(&self, span_days: i64) -> usize {
        let step = match self {
            TickGranularity::Weekly => 7,
            TickGranularity::Monthly => 30,
        };
        ((span_days.max(0) / step) as usize + 1).max(2)
    }
}

/// Date-axis display parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxisConfig {
    pub legend: &'static str,
    pub legend_offset: i32,
    pub ticks: TickGranularity,
    /// First and last date across all series, if any series has points.
    pub range: Option<(NaiveDate, NaiveDate)>,
}

/// Legend text for the Y axis.
pub fn y_legend(statistic: Statistic) -> &'static str {
    match statistic {
        Statistic::Delta => "New Cases",
        Statistic::Cumulative => "Cumulative Cases",
    }
}

/// Powers of ten from `10^0` up to `10^ceil(log10(max))`.
///
/// Always contains at least `1`, so maxima at or below one (or non-finite) still yield a
/// usable axis.
pub fn log_tick_values(max: f64) -> Vec<f64> {
    let top = if max.is_finite() && max > 1.0 {
        max.log10().ceil() as i32
    } else {
        0
    };
    (0..=top).map(|i| 10f64.powi(i)).collect()
}

/// Derive the Y-axis configuration from the modes and the largest plotted value.
pub fn y_axis(statistic: Statistic, scale: YScale, data_max: f64) -> YAxisConfig {
    let legend = y_legend(statistic);
    match scale {
        YScale::Linear => YAxisConfig {
            legend,
            legend_offset: Y_LEGEND_OFFSET,
            tick_values: None,
            grid_values: None,
            domain: YDomain::Linear,
        },
        YScale::Log => {
            let ticks = log_tick_values(data_max);
            let min = ticks.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = ticks.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            YAxisConfig {
                legend,
                legend_offset: Y_LEGEND_OFFSET,
                tick_values: Some(ticks.clone()),
                grid_values: Some(ticks),
                domain: YDomain::Log { base: 10, min, max },
            }
        }
    }
}

/// Earliest and latest date over every point of every series.
pub fn date_range(series: &[PlotSeries]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = series.iter().flat_map(|s| s.points.iter().map(|p| p.date));
    let first = dates.next()?;
    Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
}

/// Weekly ticks unless the combined date span exceeds 150 days.
pub fn tick_granularity(range: Option<(NaiveDate, NaiveDate)>) -> TickGranularity {
    match range {
        Some((lo, hi)) if (hi - lo).num_days() > MONTHLY_TICKS_AFTER_DAYS => {
            TickGranularity::Monthly
        }
        _ => TickGranularity::Weekly,
    }
}

/// Date-axis configuration, evaluated once over all series.
pub fn x_axis(series: &[PlotSeries]) -> XAxisConfig {
    let range = date_range(series);
    XAxisConfig {
        legend: "Date",
        legend_offset: X_LEGEND_OFFSET,
        ticks: tick_granularity(range),
        range,
    }
}

/// Abbreviate large numbers with at most one decimal: `1500 -> "1.5k"`, `2_000_000 -> "2m"`.
pub fn abbreviate(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    const UNITS: [(f64, &str); 4] = [(1.0e12, "t"), (1.0e9, "b"), (1.0e6, "m"), (1.0e3, "k")];
    let a = v.abs();
    let mut idx = UNITS.iter().position(|(scale, _)| a >= *scale);
    // 999_960 rounds to "1000k"; promote to the next unit instead.
    if let Some(i) = idx {
        if i > 0 && round1(a / UNITS[i].0) >= 1000.0 {
            idx = Some(i - 1);
        }
    } else if round1(a) >= 1000.0 {
        idx = Some(UNITS.len() - 1);
    }
    let (scaled, suffix) = match idx {
        Some(i) => (v / UNITS[i].0, UNITS[i].1),
        None => (v, ""),
    };
    format!("{}{}", trim_decimal(round1(scaled)), suffix)
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn trim_decimal(x: f64) -> String {
    let s = format!("{x:.1}");
    let s = s.strip_suffix(".0").unwrap_or(&s).to_string();
    if s == "-0" { "0".to_string() } else { s }
}

/// Tick label for the date axis, `M/D`.
pub fn format_tick_date(d: NaiveDate) -> String {
    format!("{}/{}", d.month(), d.day())
}

/// Tooltip title, e.g. `Mar 7th 2020`.
pub fn format_tooltip_date(d: NaiveDate) -> String {
    let day = d.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {}{} {}", d.format("%b"), day, suffix, d.year())
}
