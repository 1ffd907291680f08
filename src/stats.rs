use crate::models::PlotSeries;
use serde::{Deserialize, Serialize};

/// Summary statistics for one plotted series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub series_id: String,
    pub predicted: bool,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Value of the latest point.
    pub last: Option<f64>,
}

/// Compute statistics per series, in series order.
pub fn series_summary(series: &[PlotSeries]) -> Vec<Summary> {
    series
        .iter()
        .map(|s| {
            let last = s.points.last().map(|p| p.value);
            let mut vals: Vec<f64> = s.points.iter().map(|p| p.value).collect();
            vals.sort_by(|a, b| a.total_cmp(b));
            let count = vals.len();
            let min = vals.first().cloned();
            let max = vals.last().cloned();
            let mean = if count > 0 {
                Some(vals.iter().sum::<f64>() / count as f64)
            } else {
                None
            };
            let median = if count == 0 {
                None
            } else if count % 2 == 1 {
                Some(vals[count / 2])
            } else {
                Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
            };
            Summary {
                series_id: s.id.clone(),
                predicted: s.predicted,
                count,
                min,
                max,
                mean,
                median,
                last,
            }
        })
        .collect()
}
