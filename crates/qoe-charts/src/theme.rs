//! Chart look: colours, pixel sizes and the switch for drawing text.
//!
//! Every size is in pixels of the 300 dpi raster, so a 40 px label prints at
//! roughly 10 pt.

use plotters::prelude::*;
use plotters::style::FontDesc;

use crate::fonts::FONT_FAMILY;

/// Yellow → orange → red ramp used by the transition heatmap.
const YL_OR_RD: [(u8, u8, u8); 9] = [
    (255, 255, 204),
    (255, 237, 160),
    (254, 217, 118),
    (254, 178, 76),
    (253, 141, 60),
    (252, 78, 42),
    (227, 26, 28),
    (189, 0, 38),
    (128, 0, 38),
];

/// Colours, sizes and text switch shared by every chart.
///
/// Sizes are in pixels of the 300 dpi raster.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    // ── Canvas ───────────────────────────────────────────────────────────────
    pub background: RGBColor,
    pub grid: RGBColor,
    pub margin: i32,
    pub x_label_area: i32,
    pub y_label_area: i32,

    // ── Series ───────────────────────────────────────────────────────────────
    pub bar: RGBColor,
    pub bar_opacity: f64,
    pub density_line: RGBColor,
    pub line_width: u32,
    pub box_line: RGBColor,

    // ── Text ─────────────────────────────────────────────────────────────────
    /// Whether captions, tick labels and annotations are drawn. Only true
    /// once a font has been registered with the chart backend.
    pub text: bool,
    pub text_color: RGBColor,
    pub title_size: u32,
    pub axis_desc_size: u32,
    pub label_size: u32,
    pub annotation_size: u32,
}

impl ChartTheme {
    /// Light background with a pale grid, blue series.
    pub fn whitegrid() -> Self {
        Self {
            background: WHITE,
            grid: RGBColor(220, 220, 225),
            margin: 60,
            x_label_area: 180,
            y_label_area: 240,

            bar: RGBColor(76, 114, 176),
            bar_opacity: 0.75,
            density_line: RGBColor(76, 114, 176),
            line_width: 8,
            box_line: RGBColor(52, 52, 52),

            text: false,
            text_color: RGBColor(38, 38, 38),
            title_size: 64,
            axis_desc_size: 48,
            label_size: 40,
            annotation_size: 36,
        }
    }

    /// Same theme with text drawing switched on or off.
    pub fn with_text(mut self, text: bool) -> Self {
        self.text = text;
        self
    }

    /// Font of the registered family at `size` pixels.
    pub fn font(&self, size: u32) -> FontDesc<'static> {
        (FONT_FAMILY, f64::from(size)).into_font()
    }

    /// Heatmap colour for `value` within `[min, max]`.
    pub fn heat_color(&self, value: f64, min: f64, max: f64) -> RGBColor {
        let t = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let scaled = t * (YL_OR_RD.len() - 1) as f64;
        let lo = scaled.floor() as usize;
        let hi = (lo + 1).min(YL_OR_RD.len() - 1);
        let frac = scaled - lo as f64;
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
        let (a, b) = (YL_OR_RD[lo], YL_OR_RD[hi]);
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// Annotation colour readable on top of `cell`.
    pub fn contrast_text(&self, cell: RGBColor) -> RGBColor {
        let luminance = 0.299 * f64::from(cell.0) + 0.587 * f64::from(cell.1) + 0.114 * f64::from(cell.2);
        if luminance < 140.0 {
            WHITE
        } else {
            self.text_color
        }
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::whitegrid()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
