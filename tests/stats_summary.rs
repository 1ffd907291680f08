use chrono::NaiveDate;
use epiviz_rs::models::{PlotPoint, PlotSeries};
use epiviz_rs::stats::series_summary;
use epiviz_rs::style::series_color;

fn series(id: &str, predicted: bool, values: &[f64]) -> PlotSeries {
    let start = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
    PlotSeries {
        id: id.into(),
        points: values
            .iter()
            .enumerate()
            .map(|(i, v)| PlotPoint {
                date: start + chrono::Days::new(i as u64),
                value: *v,
            })
            .collect(),
        color: series_color(3),
        predicted,
        distancing: predicted,
    }
}

#[test]
fn summary_per_series() {
    let out = series_summary(&[
        series("Italy", false, &[4.0, 1.0, 3.0, 2.0]),
        series("Italy (SIR, distancing=true)", true, &[10.0, 30.0, 20.0]),
    ]);
    assert_eq!(out.len(), 2);

    let a = &out[0];
    assert_eq!(a.series_id, "Italy");
    assert_eq!(a.count, 4);
    assert_eq!(a.min, Some(1.0));
    assert_eq!(a.max, Some(4.0));
    assert_eq!(a.mean, Some(2.5));
    assert_eq!(a.median, Some(2.5));
    assert_eq!(a.last, Some(2.0));

    let b = &out[1];
    assert!(b.predicted);
    assert_eq!(b.median, Some(20.0));
    assert_eq!(b.last, Some(20.0));
}

#[test]
fn empty_series_has_no_statistics() {
    let out = series_summary(&[series("Empty", false, &[])]);
    assert_eq!(out[0].count, 0);
    assert_eq!(out[0].min, None);
    assert_eq!(out[0].mean, None);
    assert_eq!(out[0].last, None);
}
