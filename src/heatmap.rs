//! Heatmap data: per-area totals mapped to log-scaled fill values for a choropleth layer.
//!
//! The log transform only affects the fill color. `value_true` keeps the reported number
//! for tooltips.

use crate::models::{Area, CumulativeEntry, HeatEntry};
use crate::style::Rgb8;
use num_format::{Locale, ToFormattedString};
use std::collections::HashMap;

/// Fill color at heat value 0.
pub const HEAT_MIN_COLOR: Rgb8 = Rgb8::new(0xFC, 0xBB, 0xA0);
/// Fill color at (and above) `heat_max_value()`.
pub const HEAT_MAX_COLOR: Rgb8 = Rgb8::new(0x66, 0x00, 0x0D);
/// Case count that saturates the color scale.
pub const HEAT_SATURATION_CASES: f64 = 5_000_000.0;

/// Upper end of the heat color scale, `ln(5_000_000)`.
pub fn heat_max_value() -> f64 {
    HEAT_SATURATION_CASES.ln()
}

/// `ln(v)` for positive totals, `0` otherwise.
pub fn heat_value(v: f64) -> f64 {
    if v > 0.0 { v.ln() } else { 0.0 }
}

/// Map API totals to heat entries keyed by the area code.
pub fn build_heat_entries(entries: &[CumulativeEntry]) -> Vec<HeatEntry> {
    entries
        .iter()
        .map(|e| HeatEntry {
            id: e.area.iso_code.clone(),
            value: heat_value(e.value),
            value_true: e.value,
            area: e.area.clone(),
        })
        .collect()
}

/// Fill color for a heat value, interpolated between the min and max colors.
pub fn heat_color(value: f64) -> Rgb8 {
    let t = if value.is_finite() {
        value / heat_max_value()
    } else {
        0.0
    };
    HEAT_MIN_COLOR.lerp(HEAT_MAX_COLOR, t)
}

/// Tooltip text, `"{name}: {value_true}"`, e.g. `"Italy: 1,234.56"`.
pub fn tooltip_text(entry: &HeatEntry) -> String {
    format!(
        "{}: {}",
        entry.area.display_name(),
        format_true_value(entry.value_true)
    )
}

/// Thousands separators on the integer part and at most two decimals, trailing zeros
/// trimmed (`1234.5 -> "1,234.5"`, `5000.0 -> "5,000"`).
pub fn format_true_value(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    // Beyond 2^53 there are no fractional digits left to show.
    let fixed = if v.abs() < 9.0e15 {
        format!("{:.2}", v.abs())
    } else {
        format!("{:.0}", v.abs())
    };
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let grouped = match int_part.parse::<u128>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    let sign = if v < 0.0 && (grouped != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Which regions a map shows. Countries only unless states and provinces are switched on;
/// subdivisions are drawn on top of their country, never instead of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Regions {
    #[default]
    Countries,
    WithSubdivisions,
}

impl Regions {
    pub fn shows(&self, area: &Area) -> bool {
        match self {
            Regions::Countries => !area.is_subdivision(),
            Regions::WithSubdivisions => true,
        }
    }
}

/// Heat entries indexed by region id, as consumed by a choropleth layer.
#[derive(Debug, Clone, Default)]
pub struct HeatLayer {
    entries: Vec<HeatEntry>,
    by_id: HashMap<String, usize>,
}

impl HeatLayer {
    /// Build a layer from fresh API totals. Duplicate ids keep the last entry.
    pub fn from_cumulative(entries: &[CumulativeEntry]) -> Self {
        Self::from_entries(build_heat_entries(entries))
    }

    pub fn from_entries(entries: Vec<HeatEntry>) -> Self {
        let by_id = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        Self { entries, by_id }
    }

    pub fn entries(&self) -> &[HeatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HeatEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Resolve a click on region `id` to the originating area.
    pub fn hit(&self, id: &str) -> Option<&Area> {
        self.get(id).map(|e| &e.area)
    }

    /// Fill color for region `id`, `None` for regions without data.
    pub fn fill(&self, id: &str) -> Option<Rgb8> {
        self.get(id).map(|e| heat_color(e.value))
    }

    /// Entries shown for `regions`, in layer order.
    pub fn visible(&self, regions: Regions) -> impl Iterator<Item = &HeatEntry> {
        self.entries.iter().filter(move |e| regions.shows(&e.area))
    }

    /// Visible entries with the highest true values first.
    pub fn ranked(&self, top: usize, regions: Regions) -> Vec<&HeatEntry> {
        let mut v: Vec<&HeatEntry> = self.visible(regions).collect();
        v.sort_by(|a, b| b.value_true.total_cmp(&a.value_true).then(a.id.cmp(&b.id)));
        v.truncate(top);
        v
    }
}
