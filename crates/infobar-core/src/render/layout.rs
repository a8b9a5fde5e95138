//! Bar geometry derived from the source dimensions.
//!
//! Every size here scales with the bar height, which itself is a fixed share
//! of the photo height, so a 6000px frame and a 600px frame look the same.

use crate::types::Orientation;

/// Bar height as a share of the photo height.
const BAR_RATIO: f64 = 0.123;
/// Feather rows per bar row.
const FEATHER_DIVISOR: u32 = 25;

/// Logo height as a share of the bar height.
const LOGO_RATIO: f64 = 0.8;
/// Gap between the logo and the right edge, as a share of the logo width.
const LOGO_MARGIN_RATIO: f64 = 0.25;
/// Upward nudge of logo and model label, as a share of the bar height.
const LOGO_NUDGE_RATIO: f64 = 0.05;
/// Gap between model label and logo, per orientation, as a share of bar height.
const LABEL_GAP_LANDSCAPE: f64 = 0.3;
const LABEL_GAP_PORTRAIT: f64 = 0.15;

/// Placement of the bar on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    /// Height of the gradient bar
    pub bar_height: u32,
    /// Rows of the bar that overlap the bottom of the photo
    pub feather: u32,
    /// First canvas row covered by the bar
    pub bar_top: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub orientation: Orientation,
}

impl BarGeometry {
    pub fn for_source(width: u32, height: u32) -> Self {
        let bar_height = (height as f64 * BAR_RATIO).round() as u32;
        let feather = bar_height / FEATHER_DIVISOR;
        Self {
            bar_height,
            feather,
            bar_top: height - feather,
            canvas_width: width,
            canvas_height: height + bar_height - feather,
            orientation: Orientation::of(width, height),
        }
    }

    /// Pixel size for a font that is `ratio` of the bar height.
    pub fn font_px(&self, ratio: f32) -> f32 {
        self.bar_height as f32 * ratio
    }

    fn scaled(&self, ratio: f64) -> i64 {
        (self.bar_height as f64 * ratio).round() as i64
    }

    /// Text anchors for the landscape text layer.
    pub fn text_layout(&self) -> TextLayout {
        let summary_px = self.font_px(0.26);
        let summary_top = self.bar_top as i64 + self.scaled(0.16);
        TextLayout {
            margin_x: self.scaled(0.35),
            summary_top,
            summary_px,
            second_line_top: summary_top + (summary_px * 1.25).round() as i64,
            timestamp_px: self.font_px(0.20),
            signature_px: self.font_px(0.30),
            signature_gap: self.scaled(0.10),
        }
    }

    /// Logo size preserving aspect ratio, `None` if it would vanish.
    pub fn logo_size(&self, logo_width: u32, logo_height: u32) -> Option<(u32, u32)> {
        if logo_width == 0 || logo_height == 0 {
            return None;
        }
        let height = (self.bar_height as f64 * LOGO_RATIO).round() as u32;
        let width = (logo_width as f64 * height as f64 / logo_height as f64).round() as u32;
        if height == 0 || width == 0 {
            None
        } else {
            Some((width, height))
        }
    }

    /// Top-left of a logo of the given (already scaled) size.
    pub fn logo_origin(&self, width: u32, height: u32) -> (i64, i64) {
        let margin = (width as f64 * LOGO_MARGIN_RATIO).round() as i64;
        let x = self.canvas_width as i64 - width as i64 - margin;
        (x, self.centered_top(height))
    }

    /// Top-left of the model label that ends just before the logo.
    pub fn model_label_origin(&self, logo_x: i64, label_width: u32, label_height: u32) -> (i64, i64) {
        let gap = match self.orientation {
            Orientation::Landscape => self.scaled(LABEL_GAP_LANDSCAPE),
            Orientation::Portrait => self.scaled(LABEL_GAP_PORTRAIT),
        };
        (logo_x - gap - label_width as i64, self.centered_top(label_height))
    }

    fn centered_top(&self, height: u32) -> i64 {
        let slack = self.bar_height as i64 - height as i64;
        self.bar_top as i64 + slack / 2 - self.scaled(LOGO_NUDGE_RATIO)
    }
}

/// Anchors and sizes for the summary, timestamp and signature strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    pub margin_x: i64,
    pub summary_top: i64,
    pub summary_px: f32,
    pub second_line_top: i64,
    pub timestamp_px: f32,
    pub signature_px: f32,
    /// Space between the timestamp and the signature
    pub signature_gap: i64,
}
