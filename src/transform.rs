//! Series transformation: raw observed/predicted time series to plot-ready lines.
//!
//! - `cumulative` keeps the running totals as they come from the API
//! - `delta` takes first differences; a prediction continues from the last observed
//!   total so that predicted lines connect to the observed history
//! - on a log axis, non-positive points are dropped (for every series alike)

use crate::axis::{self, XAxisConfig, YAxisConfig};
use crate::models::{AreaForecast, Observation, PlotPoint, PlotSeries, Statistic, YScale};
use crate::style::series_color;
use serde::Serialize;
use std::collections::BTreeMap;

/// Parameters for transforming one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesParams {
    pub statistic: Statistic,
    pub scale: YScale,
    /// Baseline subtracted from the first value in delta mode.
    pub initial_value: f64,
}

impl SeriesParams {
    pub fn new(statistic: Statistic, scale: YScale) -> Self {
        Self {
            statistic,
            scale,
            initial_value: 0.0,
        }
    }

    pub fn with_initial_value(mut self, initial_value: f64) -> Self {
        self.initial_value = initial_value;
        self
    }
}

/// Identity mapping of observations to points.
pub fn cumulative_points(observations: &[Observation]) -> Vec<PlotPoint> {
    observations
        .iter()
        .map(|o| PlotPoint {
            date: o.date,
            value: o.value,
        })
        .collect()
}

/// First differences; the first point is `obs[0] - initial_value`.
pub fn delta_points(observations: &[Observation], initial_value: f64) -> Vec<PlotPoint> {
    let mut prev = initial_value;
    observations
        .iter()
        .map(|o| {
            let p = PlotPoint {
                date: o.date,
                value: o.value - prev,
            };
            prev = o.value;
            p
        })
        .collect()
}

/// Drop non-positive points on a log axis; linear axes keep everything.
pub fn filter_for_scale(points: Vec<PlotPoint>, scale: YScale) -> Vec<PlotPoint> {
    match scale {
        YScale::Linear => points,
        YScale::Log => points.into_iter().filter(|p| p.value > 0.0).collect(),
    }
}

/// Transform one series under the given statistic and scale.
pub fn process_series(observations: &[Observation], params: &SeriesParams) -> Vec<PlotPoint> {
    let points = match params.statistic {
        Statistic::Cumulative => cumulative_points(observations),
        Statistic::Delta => delta_points(observations, params.initial_value),
    };
    filter_for_scale(points, params.scale)
}

/// Largest raw value over observed and predicted series of all areas.
///
/// Raw cumulative values are used regardless of statistic, so the log axis in delta
/// mode leaves headroom up to the cumulative total.
pub fn data_max(forecasts: &BTreeMap<String, AreaForecast>) -> f64 {
    forecasts
        .values()
        .flat_map(|f| {
            f.observed
                .iter()
                .chain(f.predictions.iter().flat_map(|p| p.time_series.iter()))
        })
        .map(|o| o.value)
        .fold(0.0, f64::max)
}

fn sorted_by_date(observations: &[Observation]) -> Vec<Observation> {
    let mut out = observations.to_vec();
    out.sort_by_key(|o| o.date);
    out
}

/// Series id for a prediction line, e.g. `"Italy (SIR, distancing=true)"`.
pub fn prediction_id(area: &str, model: &str, distancing: bool) -> String {
    format!("{area} ({model}, distancing={distancing})")
}

/// Build the chart lines for every area.
///
/// Areas are taken in sorted label order so colors stay stable; each area's predictions
/// share its color. Predictions with an empty time series are skipped.
pub fn build_series(
    forecasts: &BTreeMap<String, AreaForecast>,
    statistic: Statistic,
    scale: YScale,
) -> Vec<PlotSeries> {
    let mut out = Vec::new();
    for (idx, (area, forecast)) in forecasts.iter().enumerate() {
        let color = series_color(idx);
        let observed = sorted_by_date(&forecast.observed);

        out.push(PlotSeries {
            id: area.clone(),
            points: process_series(&observed, &SeriesParams::new(statistic, scale)),
            color,
            predicted: false,
            distancing: false,
        });

        let last_observed = observed.last().map(|o| o.value).unwrap_or(0.0);
        for prediction in forecast
            .predictions
            .iter()
            .filter(|p| !p.time_series.is_empty())
        {
            let params = SeriesParams::new(statistic, scale).with_initial_value(last_observed);
            out.push(PlotSeries {
                id: prediction_id(area, &prediction.model.name, prediction.distancing),
                points: process_series(&sorted_by_date(&prediction.time_series), &params),
                color,
                predicted: true,
                distancing: prediction.distancing,
            });
        }
        log::debug!(
            "area {area}: {} observations, {} predictions",
            forecast.observed.len(),
            forecast.predictions.len()
        );
    }
    out
}

/// Everything the chart renderer needs for one draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub statistic: Statistic,
    pub scale: YScale,
    pub series: Vec<PlotSeries>,
    pub y_axis: YAxisConfig,
    pub x_axis: XAxisConfig,
}

impl ChartData {
    /// True when no series has a single point to draw.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Transform all areas and derive both axes.
pub fn build_chart(
    forecasts: &BTreeMap<String, AreaForecast>,
    statistic: Statistic,
    scale: YScale,
) -> ChartData {
    let series = build_series(forecasts, statistic, scale);
    let y_axis = axis::y_axis(statistic, scale, data_max(forecasts));
    let x_axis = axis::x_axis(&series);
    ChartData {
        statistic,
        scale,
        series,
        y_axis,
        x_axis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Model, Prediction};
    use chrono::NaiveDate;

    fn obs(values: &[f64]) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(start + chrono::Days::new(i as u64), *v))
            .collect()
    }

    fn values(points: &[PlotPoint]) -> Vec<f64> {
        points.iter().map(|p| p.value).collect()
    }

    #[test]
    fn cumulative_is_identity() {
        let input = obs(&[1.0, 4.0, 9.0]);
        let out = process_series(&input, &SeriesParams::new(Statistic::Cumulative, YScale::Linear));
        assert_eq!(out.len(), input.len());
        for (o, p) in input.iter().zip(&out) {
            assert_eq!((o.date, o.value), (p.date, p.value));
        }
    }

    #[test]
    fn delta_uses_initial_value() {
        let params = SeriesParams::new(Statistic::Delta, YScale::Linear).with_initial_value(5.0);
        let out = process_series(&obs(&[10.0, 15.0, 22.0]), &params);
        assert_eq!(values(&out), vec![5.0, 5.0, 7.0]);
    }

    #[test]
    fn log_filter_drops_non_positive() {
        let d = |n| NaiveDate::from_ymd_opt(2020, 3, n).unwrap();
        let pts = vec![
            PlotPoint { date: d(1), value: -2.0 },
            PlotPoint { date: d(2), value: 0.0 },
            PlotPoint { date: d(3), value: 3.0 },
        ];
        assert_eq!(
            filter_for_scale(pts.clone(), YScale::Log),
            vec![PlotPoint { date: d(3), value: 3.0 }]
        );
        assert_eq!(filter_for_scale(pts.clone(), YScale::Linear), pts);
    }

    #[test]
    fn empty_input_never_errors() {
        for statistic in [Statistic::Cumulative, Statistic::Delta] {
            for scale in [YScale::Linear, YScale::Log] {
                let params = SeriesParams::new(statistic, scale).with_initial_value(7.0);
                assert!(process_series(&[], &params).is_empty());
            }
        }
    }

    #[test]
    fn predictions_continue_from_last_observed() {
        let mut forecasts = BTreeMap::new();
        let observed = obs(&[10.0, 20.0, 30.0]);
        let start = observed.last().unwrap().date + chrono::Days::new(1);
        forecasts.insert(
            "Italy".to_string(),
            AreaForecast {
                observed,
                predictions: vec![
                    Prediction {
                        model: Model {
                            name: "SIR".into(),
                            description: None,
                        },
                        distancing: true,
                        time_series: vec![
                            Observation::new(start, 35.0),
                            Observation::new(start + chrono::Days::new(1), 42.0),
                        ],
                    },
                    Prediction {
                        model: Model {
                            name: "SIR".into(),
                            description: None,
                        },
                        distancing: false,
                        time_series: vec![],
                    },
                ],
            },
        );
        let series = build_series(&forecasts, Statistic::Delta, YScale::Linear);
        assert_eq!(series.len(), 2, "empty prediction is skipped");
        assert_eq!(values(&series[0].points), vec![10.0, 10.0, 10.0]);
        assert_eq!(series[1].id, "Italy (SIR, distancing=true)");
        assert_eq!(values(&series[1].points), vec![5.0, 7.0]);
        assert!(series[1].predicted && series[1].distancing);
        assert_eq!(series[0].color, series[1].color);
    }

    #[test]
    fn areas_sorted_and_colored_by_index() {
        let mut forecasts = BTreeMap::new();
        for name in ["Spain", "France", "Austria"] {
            forecasts.insert(
                name.to_string(),
                AreaForecast {
                    observed: obs(&[1.0]),
                    predictions: vec![],
                },
            );
        }
        let series = build_series(&forecasts, Statistic::Cumulative, YScale::Linear);
        let ids: Vec<&str> = series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["Austria", "France", "Spain"]);
        assert_eq!(series[2].color, series_color(2));
    }

    #[test]
    fn chart_uses_raw_max_for_log_ticks() {
        let mut forecasts = BTreeMap::new();
        forecasts.insert(
            "A".to_string(),
            AreaForecast {
                observed: obs(&[0.0, 100.0, 4500.0]),
                predictions: vec![],
            },
        );
        let chart = build_chart(&forecasts, Statistic::Delta, YScale::Log);
        assert_eq!(
            chart.y_axis.tick_values,
            Some(vec![1.0, 10.0, 100.0, 1000.0, 10000.0])
        );
        // first delta is 0 and is dropped on the log axis
        assert_eq!(values(&chart.series[0].points), vec![100.0, 4400.0]);
        assert!(!chart.is_empty());
    }
}
