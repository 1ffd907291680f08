//! Utility functions for visualization: colors, strokes, axis bounds, label sizing.

use crate::axis::abbreviate;
use crate::models::PlotSeries;
use crate::style::{Rgb8, STROKE_WIDTH, StrokePattern, stroke_pattern};
use chrono::{Days, NaiveDate};
use plotters::prelude::*;

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&out, font_px) + estimate_text_width_px("…", font_px) > max_px {
            out.pop();
            break;
        }
    }
    out.push('…');
    out
}

#[inline]
pub fn plotters_color(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Stroke style and dash pattern for a series.
pub fn series_stroke(series: &PlotSeries) -> (ShapeStyle, StrokePattern) {
    let style = plotters_color(series.color).stroke_width(STROKE_WIDTH);
    (style, stroke_pattern(series.predicted, series.distancing))
}

/// Date bounds for the X axis; a single day is widened by one day on each side.
pub fn date_bounds(range: (NaiveDate, NaiveDate)) -> (NaiveDate, NaiveDate) {
    let (lo, hi) = range;
    if lo == hi {
        (
            lo.checked_sub_days(Days::new(1)).unwrap_or(lo),
            hi.checked_add_days(Days::new(1)).unwrap_or(hi),
        )
    } else {
        (lo, hi)
    }
}

/// Auto-fitted linear bounds over every plotted value, padded by 5%.
pub fn linear_bounds(series: &[PlotSeries]) -> Option<(f64, f64)> {
    let mut values = series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
    let first = values.next()?;
    let (mut lo, mut hi) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = (hi - lo) * 0.05;
    Some((lo - pad, hi + pad))
}

/// Compute a tight left label area width for the Y axis (in pixels), based on the
/// abbreviated tick labels between `lo` and `hi`.
///
/// Returns a width clamped to a sensible range to avoid extremes.
pub fn compute_left_label_area_px(lo: f64, hi: f64, ticks: usize, font_px: u32) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let s = abbreviate(lo + (hi - lo) * t);
        max_px = max_px.max(estimate_text_width_px(&s, font_px));
    }
    // Room for the tick marks and the rotated axis legend.
    max_px.saturating_add(44).clamp(60, 140)
}
