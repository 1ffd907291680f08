use crate::error::Result;
use crate::models::{HeatEntry, PlotSeries};
use crate::style::{STROKE_WIDTH, stroke_pattern};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn safe_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Save plot series as long-format CSV (one row per point) with header.
pub fn save_series_csv<P: AsRef<Path>>(series: &[PlotSeries], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["series_id", "date", "value", "predicted", "distancing", "color"])?;
    for s in series {
        let id = safe_cell(&s.id);
        let color = s.color.hex();
        for p in &s.points {
            wtr.serialize((
                &id,
                p.date.format("%Y-%m-%d").to_string(),
                p.value,
                s.predicted,
                s.distancing,
                &color,
            ))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// A series plus the stroke a web chart needs to draw it.
#[derive(Serialize)]
struct SeriesRecord<'a> {
    #[serde(flatten)]
    series: &'a PlotSeries,
    stroke_width: u32,
    dasharray: Option<String>,
}

impl<'a> From<&'a PlotSeries> for SeriesRecord<'a> {
    fn from(series: &'a PlotSeries) -> Self {
        Self {
            series,
            stroke_width: STROKE_WIDTH,
            dasharray: stroke_pattern(series.predicted, series.distancing).dasharray(),
        }
    }
}

/// Save plot series as a pretty JSON array, with `stroke_width` and `dasharray` per series.
pub fn save_series_json<P: AsRef<Path>>(series: &[PlotSeries], path: P) -> Result<()> {
    let records: Vec<SeriesRecord> = series.iter().map(SeriesRecord::from).collect();
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save heat entries as CSV with header.
pub fn save_heat_csv<P: AsRef<Path>>(entries: &[HeatEntry], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["id", "name", "value", "value_true"])?;
    for e in entries {
        wtr.serialize((
            safe_cell(&e.id),
            safe_cell(&e.area.display_name()),
            e.value,
            e.value_true,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save heat entries as a pretty JSON array.
pub fn save_heat_json<P: AsRef<Path>>(entries: &[HeatEntry], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(entries)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
