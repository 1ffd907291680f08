use chrono::{Days, NaiveDate};
use epiviz_rs::axis::{self, TickGranularity};
use epiviz_rs::models::{
    AreaForecast, Model, Observation, PlotPoint, Prediction, Statistic, YScale,
};
use epiviz_rs::style::series_color;
use epiviz_rs::transform::{self, SeriesParams};
use std::collections::BTreeMap;

fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, 1).unwrap() + Days::new(n)
}

fn obs(start: u64, values: &[f64]) -> Vec<Observation> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| Observation::new(day(start + i as u64), *v))
        .collect()
}

fn prediction(name: &str, distancing: bool, series: Vec<Observation>) -> Prediction {
    Prediction {
        model: Model {
            name: name.into(),
            description: None,
        },
        distancing,
        time_series: series,
    }
}

#[test]
fn cumulative_mode_keeps_values_and_dates() {
    let input = obs(0, &[3.0, 0.0, 7.5, 7.5]);
    let out = transform::process_series(
        &input,
        &SeriesParams::new(Statistic::Cumulative, YScale::Linear),
    );
    assert_eq!(out.len(), input.len());
    for (o, p) in input.iter().zip(&out) {
        assert_eq!(p.date, o.date);
        assert_eq!(p.value, o.value);
    }
}

#[test]
fn delta_mode_subtracts_previous_value() {
    let params = SeriesParams::new(Statistic::Delta, YScale::Linear).with_initial_value(5.0);
    let out = transform::process_series(&obs(0, &[10.0, 15.0, 22.0]), &params);
    let vals: Vec<f64> = out.iter().map(|p| p.value).collect();
    assert_eq!(vals, vec![5.0, 5.0, 7.0]);
}

#[test]
fn log_scale_drops_non_positive_points() {
    let pts = vec![
        PlotPoint { date: day(0), value: -2.0 },
        PlotPoint { date: day(1), value: 0.0 },
        PlotPoint { date: day(2), value: 3.0 },
    ];
    let log = transform::filter_for_scale(pts.clone(), YScale::Log);
    assert_eq!(log, vec![PlotPoint { date: day(2), value: 3.0 }]);
    let lin = transform::filter_for_scale(pts.clone(), YScale::Linear);
    assert_eq!(lin, pts);
}

#[test]
fn log_ticks_for_4500() {
    assert_eq!(
        axis::log_tick_values(4500.0),
        vec![1.0, 10.0, 100.0, 1000.0, 10000.0]
    );
    let y = axis::y_axis(Statistic::Cumulative, YScale::Log, 4500.0);
    assert!(y.is_log());
    assert_eq!(y.tick_values, y.grid_values);
}

#[test]
fn tick_granularity_switches_after_150_days() {
    let lo = day(0);
    assert_eq!(
        axis::tick_granularity(Some((lo, lo + Days::new(150)))),
        TickGranularity::Weekly
    );
    assert_eq!(
        axis::tick_granularity(Some((lo, lo + Days::new(151)))),
        TickGranularity::Monthly
    );
    assert_eq!(axis::tick_granularity(None), TickGranularity::Weekly);
}

#[test]
fn empty_input_yields_empty_output() {
    for statistic in [Statistic::Cumulative, Statistic::Delta] {
        for scale in [YScale::Linear, YScale::Log] {
            let out = transform::process_series(&[], &SeriesParams::new(statistic, scale));
            assert!(out.is_empty());
        }
    }
}

#[test]
fn chart_assembles_areas_in_order_with_predictions() {
    let mut forecasts = BTreeMap::new();
    forecasts.insert(
        "Spain".to_string(),
        AreaForecast {
            observed: obs(0, &[100.0, 150.0]),
            predictions: vec![
                prediction("SIR", true, obs(2, &[180.0, 200.0])),
                prediction("SIR", false, Vec::new()),
            ],
        },
    );
    forecasts.insert(
        "Italy".to_string(),
        AreaForecast {
            observed: obs(0, &[10.0, 40.0]),
            predictions: Vec::new(),
        },
    );

    let chart = transform::build_chart(&forecasts, Statistic::Delta, YScale::Linear);
    let ids: Vec<&str> = chart.series.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["Italy", "Spain", "Spain (SIR, distancing=true)"]);

    assert_eq!(chart.series[0].color, series_color(0));
    assert_eq!(chart.series[1].color, series_color(1));
    assert_eq!(chart.series[2].color, series_color(1));
    assert!(chart.series[2].predicted && chart.series[2].distancing);

    // Predictions continue from the last observed value.
    let pred: Vec<f64> = chart.series[2].points.iter().map(|p| p.value).collect();
    assert_eq!(pred, vec![30.0, 20.0]);

    assert_eq!(chart.y_axis.legend, "New Cases");
    assert_eq!(chart.x_axis.range, Some((day(0), day(3))));
    assert_eq!(chart.x_axis.ticks, TickGranularity::Weekly);
}

#[test]
fn empty_chart_is_reported_empty() {
    let chart = transform::build_chart(&BTreeMap::new(), Statistic::Cumulative, YScale::Log);
    assert!(chart.is_empty());
    assert_eq!(chart.x_axis.range, None);
    assert_eq!(chart.y_axis.tick_values, Some(vec![1.0]));
}

#[test]
fn tick_and_tooltip_date_formats() {
    let d = NaiveDate::from_ymd_opt(2020, 3, 7).unwrap();
    assert_eq!(axis::format_tick_date(d), "3/7");
    assert_eq!(axis::format_tooltip_date(d), "Mar 7th 2020");
    let d = NaiveDate::from_ymd_opt(2020, 4, 22).unwrap();
    assert_eq!(axis::format_tooltip_date(d), "Apr 22nd 2020");
}
