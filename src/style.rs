//! Series styling: one palette color per area, stroke pattern per series kind.
//!
//! Design:
//! - Area: assigned a palette color by its position in the sorted area list, so an area keeps
//!   its color across redraws as long as the selection does not change.
//! - Series kind: observed data is drawn solid; predictions are dashed, with a sparser
//!   pattern for the no-distancing scenario.

use serde::{Serialize, Serializer};

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB` (upper-case hex).
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Linear interpolation toward `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb8, t: f64) -> Rgb8 {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb8::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl Serialize for Rgb8 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

/// Primary tones of the line palette, in assignment order:
/// red, gold, lime, cyan, geekblue, purple, magenta.
pub const PALETTE: [Rgb8; 7] = [
    Rgb8::new(0xF5, 0x22, 0x2D), // red      (#F5222D)
    Rgb8::new(0xFA, 0xAD, 0x14), // gold     (#FAAD14)
    Rgb8::new(0xA0, 0xD9, 0x11), // lime     (#A0D911)
    Rgb8::new(0x13, 0xC2, 0xC2), // cyan     (#13C2C2)
    Rgb8::new(0x2F, 0x54, 0xEB), // geekblue (#2F54EB)
    Rgb8::new(0x72, 0x2E, 0xD1), // purple   (#722ED1)
    Rgb8::new(0xEB, 0x2F, 0x96), // magenta  (#EB2F96)
];

/// Line color for the `idx`-th area (wraps around the palette).
#[inline]
pub fn series_color(idx: usize) -> Rgb8 {
    PALETTE[idx % PALETTE.len()]
}

/// Stroke width for every chart line, in pixels.
pub const STROKE_WIDTH: u32 = 3;

/// How a line is stroked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokePattern {
    Solid,
    /// Dash length and gap length in pixels.
    Dashed { dash: u32, gap: u32 },
}

impl StrokePattern {
    /// SVG `stroke-dasharray` value, `None` for solid lines.
    pub fn dasharray(&self) -> Option<String> {
        match self {
            StrokePattern::Solid => None,
            StrokePattern::Dashed { dash, gap } => Some(format!("{dash}, {gap}")),
        }
    }
}

/// Pattern for a series: solid when observed, `6,4` for predictions with distancing,
/// `2,6` for predictions without.
pub fn stroke_pattern(predicted: bool, distancing: bool) -> StrokePattern {
    match (predicted, distancing) {
        (false, _) => StrokePattern::Solid,
        (true, true) => StrokePattern::Dashed { dash: 6, gap: 4 },
        (true, false) => StrokePattern::Dashed { dash: 2, gap: 6 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        assert_eq!(series_color(0), series_color(7));
        assert_eq!(series_color(3).hex(), "#13C2C2");
    }

    #[test]
    fn hex_is_upper_case_and_padded() {
        assert_eq!(Rgb8::new(0xFC, 0xBB, 0xA0).hex(), "#FCBBA0");
        assert_eq!(Rgb8::new(0x66, 0x00, 0x0D).hex(), "#66000D");
    }

    #[test]
    fn lerp_clamps() {
        let a = Rgb8::new(0, 0, 0);
        let b = Rgb8::new(200, 100, 50);
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb8::new(100, 50, 25));
    }

    #[test]
    fn stroke_patterns_by_kind() {
        assert_eq!(stroke_pattern(false, true), StrokePattern::Solid);
        assert_eq!(stroke_pattern(true, true).dasharray().as_deref(), Some("6, 4"));
        assert_eq!(stroke_pattern(true, false).dasharray().as_deref(), Some("2, 6"));
    }
}
