//! Visualization: render forecast charts and heat rankings to **SVG** or **PNG**.
//!
//! - Date X axis with weekly or monthly ticks (`M/D` labels)
//! - Linear or log10 Y axis with abbreviated labels (`1.5k`, `2m`)
//! - Observed lines solid, predicted lines dashed (denser dashes with distancing)
//! - Legend placement: `Inside` (upper-left overlay) or `Right` (separate panel)
//! - Heat ranking: top areas as bars filled with the choropleth color scale

pub mod font;
pub mod legend;
pub mod types;
pub mod util;

pub use font::{ensure_fonts_registered, font_available};
pub use types::{LegendMode, RenderOptions};

use crate::axis::{YDomain, abbreviate, format_tick_date};
use crate::error::{Error, Result};
use crate::heatmap::{HeatLayer, Regions, heat_color};
use crate::style::{STROKE_WIDTH, StrokePattern};
use crate::transform::ChartData;

use chrono::NaiveDate;
use plotters::backend::DrawingBackend;
use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use plotters::series::{DashedLineSeries, LineSeries};
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

use legend::{LegendItem, draw_legend_panel, estimate_right_legend_width_px, sample_segments};
use util::{
    compute_left_label_area_px, date_bounds, estimate_text_width_px, linear_bounds,
    plotters_color, series_stroke,
};

const MARGIN: u32 = 16;

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// Render the line chart to `out_path` (`.svg` → SVG, anything else → bitmap).
pub fn plot_forecast<P: AsRef<Path>>(
    chart: &ChartData,
    out_path: P,
    opts: &RenderOptions,
) -> Result<()> {
    if chart.is_empty() {
        return Err(Error::NoData);
    }
    let range = chart.x_axis.range.ok_or(Error::NoData)?;
    ensure_fonts_registered(opts.font_path.as_deref())?;

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (opts.width, opts.height);
    log::debug!(
        "rendering {} series to {}",
        chart.series.len(),
        out_path.display()
    );

    if is_svg(out_path) {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_forecast(root, chart, range, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_forecast(root, chart, range, opts)
    }
}

fn draw_forecast<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    chart: &ChartData,
    range: (NaiveDate, NaiveDate),
    opts: &RenderOptions,
) -> Result<()> {
    root.fill(&WHITE).map_err(Error::render)?;

    let drawn: Vec<_> = chart.series.iter().filter(|s| !s.points.is_empty()).collect();
    let legend_items: Vec<LegendItem> = drawn
        .iter()
        .map(|s| {
            let (_, pattern) = series_stroke(s);
            LegendItem {
                label: s.id.clone(),
                color: plotters_color(s.color),
                pattern,
            }
        })
        .collect();

    let (root_w, _) = root.dim_in_pixel();
    let (plot_area, legend_area) = match opts.legend {
        LegendMode::Right => {
            let labels: Vec<String> = legend_items.iter().map(|i| i.label.clone()).collect();
            let legend_w = estimate_right_legend_width_px(&labels, 14, root_w / 3);
            let (plot, legend) = root.split_horizontally(root_w.saturating_sub(legend_w));
            (plot, Some(legend))
        }
        LegendMode::Inside => (root, None),
    };
    let inside = legend_area.is_none();

    let title = if opts.title.trim().is_empty() {
        chart.y_axis.legend.to_string()
    } else {
        opts.title.trim().to_string()
    };

    let (x_lo, x_hi) = date_bounds(range);
    let x_labels = chart
        .x_axis
        .ticks
        .tick_count((x_hi - x_lo).num_days())
        .min(24);
    let x_fmt = |d: &NaiveDate| format_tick_date(*d);
    let y_fmt = |v: &f64| abbreviate(*v);

    match &chart.y_axis.domain {
        YDomain::Log { min, max, .. } => {
            let (lo, hi) = if max > min { (*min, *max) } else { (*min, *min * 10.0) };
            let ticks = chart.y_axis.tick_values.as_ref().map(Vec::len).unwrap_or(2);
            let left = compute_left_label_area_px(lo, hi, ticks, 12);
            let mut cc = ChartBuilder::on(&plot_area)
                .margin(MARGIN)
                .caption(title, (FontFamily::SansSerif, 24))
                .set_label_area_size(LabelAreaPosition::Left, left)
                .set_label_area_size(LabelAreaPosition::Bottom, 56)
                .build_cartesian_2d(x_lo..x_hi, (lo..hi).log_scale())
                .map_err(Error::render)?;

            cc.configure_mesh()
                .disable_y_mesh()
                .x_desc(chart.x_axis.legend)
                .y_desc(chart.y_axis.legend)
                .x_labels(x_labels)
                .y_labels(ticks.max(2))
                .x_label_formatter(&x_fmt)
                .y_label_formatter(&y_fmt)
                .label_style((FontFamily::SansSerif, 12))
                .axis_desc_style((FontFamily::SansSerif, 16))
                .draw()
                .map_err(Error::render)?;

            // Log axes get their horizontal grid exactly at the tick values.
            if let Some(grid) = &chart.y_axis.grid_values {
                cc.draw_series(grid.iter().map(|g| {
                    PathElement::new(vec![(x_lo, *g), (x_hi, *g)], BLACK.mix(0.15))
                }))
                .map_err(Error::render)?;
            }
            draw_lines(&mut cc, chart, inside)?;
        }
        YDomain::Linear => {
            let (lo, hi) = linear_bounds(&chart.series).ok_or(Error::NoData)?;
            let left = compute_left_label_area_px(lo, hi, 10, 12);
            let mut cc = ChartBuilder::on(&plot_area)
                .margin(MARGIN)
                .caption(title, (FontFamily::SansSerif, 24))
                .set_label_area_size(LabelAreaPosition::Left, left)
                .set_label_area_size(LabelAreaPosition::Bottom, 56)
                .build_cartesian_2d(x_lo..x_hi, lo..hi)
                .map_err(Error::render)?;

            cc.configure_mesh()
                .x_desc(chart.x_axis.legend)
                .y_desc(chart.y_axis.legend)
                .x_labels(x_labels)
                .y_labels(10)
                .x_label_formatter(&x_fmt)
                .y_label_formatter(&y_fmt)
                .label_style((FontFamily::SansSerif, 12))
                .axis_desc_style((FontFamily::SansSerif, 16))
                .draw()
                .map_err(Error::render)?;

            draw_lines(&mut cc, chart, inside)?;
        }
    }

    if let Some(ref legend_area) = legend_area {
        draw_legend_panel(legend_area, &legend_items)?;
        legend_area.present().map_err(Error::render)?;
    }
    plot_area.present().map_err(Error::render)?;
    Ok(())
}

/// Draw every non-empty series onto an already configured chart.
fn draw_lines<'a, DB, CT>(
    cc: &mut ChartContext<'a, DB, CT>,
    chart: &ChartData,
    inside_legend: bool,
) -> Result<()>
where
    DB: DrawingBackend + 'a,
    CT: CoordTranslate<From = (NaiveDate, f64)>,
{
    for s in chart.series.iter().filter(|s| !s.points.is_empty()) {
        let (style, pattern) = series_stroke(s);
        let pts: Vec<(NaiveDate, f64)> = s.points.iter().map(|p| (p.date, p.value)).collect();
        let anno = match pattern {
            StrokePattern::Solid => cc
                .draw_series(LineSeries::new(pts, style))
                .map_err(Error::render)?,
            StrokePattern::Dashed { dash, gap } => cc
                .draw_series(DashedLineSeries::new(pts, dash, gap, style))
                .map_err(Error::render)?,
        };
        if inside_legend {
            let color = plotters_color(s.color);
            anno.label(s.id.clone()).legend(move |(x, y)| {
                let st = color.stroke_width(STROKE_WIDTH);
                let [a, b, c] = sample_segments(pattern);
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(a.0, 0), (a.1, 0)], st)
                    + PathElement::new(vec![(b.0, 0), (b.1, 0)], st)
                    + PathElement::new(vec![(c.0, 0), (c.1, 0)], st)
            });
        }
    }

    if inside_legend {
        cc.configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(Error::render)?;
    }
    Ok(())
}

/// Render the `top` visible areas of a heat layer as horizontal bars, largest first, each
/// filled with its choropleth color and labelled with the true value.
pub fn plot_heat_ranking<P: AsRef<Path>>(
    layer: &HeatLayer,
    out_path: P,
    top: usize,
    regions: Regions,
    opts: &RenderOptions,
) -> Result<()> {
    if layer.ranked(top, regions).is_empty() {
        return Err(Error::NoData);
    }
    ensure_fonts_registered(opts.font_path.as_deref())?;

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (opts.width, opts.height);
    if is_svg(out_path) {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_heat_ranking(root, layer, top, regions, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_heat_ranking(root, layer, top, regions, opts)
    }
}

fn draw_heat_ranking<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    layer: &HeatLayer,
    top: usize,
    regions: Regions,
    opts: &RenderOptions,
) -> Result<()> {
    root.fill(&WHITE).map_err(Error::render)?;

    let ranked = layer.ranked(top, regions);
    let n = ranked.len();
    let max_true = ranked
        .iter()
        .map(|e| e.value_true)
        .fold(1.0, f64::max);
    // Row 0 is the bottom of the chart, so the largest area sits on top.
    let names: Vec<String> = ranked.iter().rev().map(|e| e.area.display_name()).collect();
    let left = names
        .iter()
        .map(|s| estimate_text_width_px(s, 12))
        .max()
        .unwrap_or(0)
        .saturating_add(16)
        .clamp(60, 220);

    let title = if opts.title.trim().is_empty() {
        "Cases by Area".to_string()
    } else {
        opts.title.trim().to_string()
    };

    let mut cc = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption(title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, left)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0f64..max_true * 1.15, -0.5f64..(n as f64 - 0.5))
        .map_err(Error::render)?;

    let row_name = |y: &f64| {
        let r = y.round();
        if (y - r).abs() < 1e-6 && r >= 0.0 && (r as usize) < n {
            names[r as usize].clone()
        } else {
            String::new()
        }
    };
    let x_fmt = |v: &f64| abbreviate(*v);

    cc.configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .x_labels(8)
        .y_label_formatter(&row_name)
        .x_label_formatter(&x_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(Error::render)?;

    let rows: Vec<(f64, f64, RGBColor)> = ranked
        .iter()
        .enumerate()
        .map(|(rank, e)| {
            (
                (n - 1 - rank) as f64,
                e.value_true,
                plotters_color(heat_color(e.value)),
            )
        })
        .collect();

    cc.draw_series(rows.iter().map(|(row, v, color)| {
        Rectangle::new([(0.0, row - 0.4), (*v, row + 0.4)], color.filled())
    }))
    .map_err(Error::render)?;

    cc.draw_series(rows.iter().map(|(row, v, _)| {
        EmptyElement::at((*v, *row))
            + Text::new(
                abbreviate(*v),
                (4, -6),
                (FontFamily::SansSerif, 12).into_font(),
            )
    }))
    .map_err(Error::render)?;

    root.present().map_err(Error::render)?;
    Ok(())
}
