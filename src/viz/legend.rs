//! Legend drawing: line samples that repeat each series' color and dash pattern.

use crate::error::{Error, Result};
use crate::style::{STROKE_WIDTH, StrokePattern};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::util::{estimate_text_width_px, truncate_to_width};

/// One legend row.
#[derive(Debug, Clone)]
pub struct LegendItem {
    pub label: String,
    pub color: RGBColor,
    pub pattern: StrokePattern,
}

/// Width of the line sample in front of each label.
pub const SAMPLE_W: i32 = 24;

/// Horizontal extents of the three strokes that make up a line sample.
/// Solid samples are three touching strokes; dashed ones repeat the dash/gap rhythm.
pub fn sample_segments(pattern: StrokePattern) -> [(i32, i32); 3] {
    match pattern {
        StrokePattern::Solid => [(0, 8), (8, 16), (16, SAMPLE_W)],
        StrokePattern::Dashed { dash, gap } => {
            let dash = dash.max(1) as i32;
            let step = dash + gap as i32;
            let seg = |k: i32| ((k * step).min(SAMPLE_W), (k * step + dash).min(SAMPLE_W));
            [seg(0), seg(1), seg(2)]
        }
    }
}

/// Estimate how wide the right-hand legend panel must be for `labels`, in pixels.
pub fn estimate_right_legend_width_px(labels: &[String], font_px: u32, max_px: u32) -> u32 {
    let text = labels
        .iter()
        .map(|l| estimate_text_width_px(l, font_px))
        .max()
        .unwrap_or(0);
    (text + SAMPLE_W as u32 + 24).clamp(120, max_px.max(120))
}

/// Draw a single-column legend panel (used for `LegendMode::Right`).
pub fn draw_legend_panel<DB: DrawingBackend>(
    legend_area: &DrawingArea<DB, Shift>,
    items: &[LegendItem],
) -> Result<()> {
    legend_area.fill(&WHITE).map_err(Error::render)?;

    let (w_u32, _) = legend_area.dim_in_pixel();
    let w = w_u32 as i32;

    let font_px: u32 = 14;
    let line_h: i32 = font_px as i32 + 8;
    let pad_x: i32 = 6;
    let text_x = pad_x + SAMPLE_W + 8;
    let max_text_w = (w - text_x - pad_x).max(40) as u32;
    let label_style: TextStyle =
        TextStyle::from((FontFamily::SansSerif, font_px)).pos(Pos::new(HPos::Left, VPos::Center));

    let mut y = 24;
    for item in items {
        let stroke = item.color.stroke_width(STROKE_WIDTH);
        for (x0, x1) in sample_segments(item.pattern) {
            if x1 > x0 {
                legend_area
                    .draw(&PathElement::new(vec![(pad_x + x0, y), (pad_x + x1, y)], stroke))
                    .map_err(Error::render)?;
            }
        }
        let text = truncate_to_width(&item.label, font_px, max_text_w);
        legend_area
            .draw(&Text::new(text, (text_x, y), label_style.clone()))
            .map_err(Error::render)?;
        y += line_h;
    }
    Ok(())
}
