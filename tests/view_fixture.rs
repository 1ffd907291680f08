use chrono::NaiveDate;
use epiviz_rs::api::{self, DataSource, MapMode, PredictQuery};
use epiviz_rs::heatmap::Regions;
use epiviz_rs::models::{
    Area, AreaForecast, CumulativeEntry, Model, Observation, Prediction, Statistic, YScale,
};
use epiviz_rs::view::{self, Applied, ChartRequest, View, ViewState};
use epiviz_rs::{Error, Result};
use std::cell::RefCell;

/// Literal fixture data; records which endpoints were hit.
#[derive(Default)]
struct Fixture {
    calls: RefCell<Vec<String>>,
}

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 4, day).unwrap()
}

impl DataSource for Fixture {
    fn areas(&self) -> Result<Vec<Area>> {
        Ok(vec![Area::new("IT", "Italy"), Area::new("ES", "Spain")])
    }

    fn models(&self) -> Result<Vec<Model>> {
        Ok(vec![Model {
            name: "SIR".into(),
            description: None,
        }])
    }

    fn cumulative_infections(&self) -> Result<Vec<CumulativeEntry>> {
        self.calls.borrow_mut().push("cumulative".into());
        Ok(vec![CumulativeEntry {
            area: Area::new("IT", "Italy"),
            value: 1000.0,
        }])
    }

    fn predict(&self, query: &PredictQuery) -> Result<AreaForecast> {
        self.calls
            .borrow_mut()
            .push(format!("predict {}", query.area.iso_code));
        let predictions = query
            .models
            .iter()
            .map(|m| Prediction {
                model: Model {
                    name: m.clone(),
                    description: None,
                },
                distancing: query.distancing.unwrap_or(true),
                time_series: vec![Observation::new(d(3), 40.0)],
            })
            .collect();
        Ok(AreaForecast {
            observed: vec![Observation::new(d(1), 10.0), Observation::new(d(2), 25.0)],
            predictions,
        })
    }

    fn predict_all(&self, model: &str, days: u32) -> Result<Vec<CumulativeEntry>> {
        self.calls
            .borrow_mut()
            .push(format!("predict_all {model} {days}"));
        let mut lombardy = Area::new("IT-25", "Lombardy");
        lombardy.country = Some("Italy".into());
        lombardy.state = Some("Lombardy".into());
        Ok(vec![
            CumulativeEntry {
                area: Area::new("IT", "Italy"),
                value: 5000.0,
            },
            CumulativeEntry {
                area: Area::new("ES", "Spain"),
                value: 0.0,
            },
            CumulativeEntry {
                area: lombardy,
                value: 7200.5,
            },
        ])
    }
}

struct Offline;

impl DataSource for Offline {
    fn areas(&self) -> Result<Vec<Area>> {
        Err(offline())
    }
    fn models(&self) -> Result<Vec<Model>> {
        Err(offline())
    }
    fn cumulative_infections(&self) -> Result<Vec<CumulativeEntry>> {
        Err(offline())
    }
    fn predict(&self, _: &PredictQuery) -> Result<AreaForecast> {
        Err(offline())
    }
    fn predict_all(&self, _: &str, _: u32) -> Result<Vec<CumulativeEntry>> {
        Err(offline())
    }
}

fn offline() -> Error {
    Error::Http {
        url: "http://localhost:8000/api/areas/".into(),
        message: "connection refused".into(),
    }
}

#[test]
fn chart_view_rebuilds_from_fixture() {
    let source = Fixture::default();
    let wanted = ["it".to_string(), "Spain".to_string()];
    let areas = api::resolve_areas(&source.areas().unwrap(), &wanted).unwrap();
    let req = ChartRequest {
        areas,
        models: vec!["SIR".into()],
        days: 14,
        distancing: Some(false),
        statistic: Statistic::Cumulative,
        scale: YScale::Log,
    };

    let mut v = View::new();
    assert_eq!(view::load_chart(&mut v, &source, &req), Applied::Rebuilt);
    let chart = v.model().unwrap();
    let ids: Vec<&str> = chart.series.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "Italy",
            "Italy (SIR, distancing=false)",
            "Spain",
            "Spain (SIR, distancing=false)"
        ]
    );
    assert_eq!(chart.y_axis.tick_values, Some(vec![1.0, 10.0, 100.0]));
    assert_eq!(
        source.calls.borrow().as_slice(),
        ["predict IT", "predict ES"]
    );
    assert_eq!(v.rebuilds(), 1);
}

#[test]
fn code_and_name_of_one_area_fetch_once() {
    let source = Fixture::default();
    let wanted = ["IT".to_string(), "Italy".to_string()];
    let areas = api::resolve_areas(&source.areas().unwrap(), &wanted).unwrap();
    assert_eq!(areas.len(), 1);

    let forecasts = api::fetch_forecasts(&source, &areas, &[], 7, None).unwrap();
    assert_eq!(forecasts.len(), 1);
    assert_eq!(source.calls.borrow().as_slice(), ["predict IT"]);
}

#[test]
fn unknown_area_is_a_config_error() {
    let source = Fixture::default();
    let wanted = ["Atlantis".to_string()];
    let err = api::resolve_areas(&source.areas().unwrap(), &wanted).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn map_mode_selects_endpoint() {
    let source = Fixture::default();
    let mut v = View::new();

    assert_eq!(view::load_map(&mut v, &source, &MapMode::Current), Applied::Rebuilt);
    assert_eq!(v.model().unwrap().len(), 1);

    let predicted = MapMode::Predicted {
        model: "SIR".into(),
        days: 30,
    };
    assert_eq!(view::load_map(&mut v, &source, &predicted), Applied::Rebuilt);
    let layer = v.model().unwrap();
    assert_eq!(layer.len(), 3);
    assert_eq!(layer.get("ES").unwrap().value, 0.0);
    assert_eq!(layer.get("IT").unwrap().value_true, 5000.0);

    // A predicted mode without a model falls back to current totals.
    let blank = MapMode::Predicted {
        model: " ".into(),
        days: 30,
    };
    view::load_map(&mut v, &source, &blank);
    assert_eq!(
        source.calls.borrow().as_slice(),
        ["cumulative", "predict_all SIR 30", "cumulative"]
    );
}

#[test]
fn failing_source_leaves_view_failed() {
    let mut v = View::new();
    assert_eq!(
        view::load_map(&mut v, &Offline, &MapMode::Current),
        Applied::Failed
    );
    match v.state() {
        ViewState::Failed(msg) => assert!(msg.contains("connection refused")),
        other => panic!("unexpected state: {other:?}"),
    }
    assert!(v.model().is_none());
}

#[test]
fn predicted_map_hides_provinces_until_requested() {
    let source = Fixture::default();
    let mut v = View::new();
    let mode = MapMode::Predicted {
        model: "SIR".into(),
        days: 7,
    };
    view::load_map(&mut v, &source, &mode);
    let layer = v.model().unwrap();

    let countries: Vec<&str> = layer
        .ranked(10, Regions::Countries)
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(countries, ["IT", "ES"]);

    let all: Vec<&str> = layer
        .ranked(10, Regions::WithSubdivisions)
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(all, ["IT-25", "IT", "ES"]);
    assert_eq!(layer.visible(Regions::Countries).count(), 2);
}
