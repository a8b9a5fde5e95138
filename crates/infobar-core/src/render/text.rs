//! Font loading, measurement and drawing.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

use crate::error::AssetError;

/// A loaded font face.
#[derive(Clone)]
pub struct Typeface {
    font: FontArc,
}

impl Typeface {
    pub fn from_file(path: &Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path).map_err(|e| AssetError::Font {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| AssetError::Font {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self { font })
    }

    /// Rendered width and height of `text` at `px` pixels.
    pub fn measure(&self, text: &str, px: f32) -> (u32, u32) {
        text_size(PxScale::from(px), &self.font, text)
    }

    /// Distance from the top of a line to its baseline at `px` pixels.
    pub fn ascent(&self, px: f32) -> f32 {
        self.font.as_scaled(PxScale::from(px)).ascent()
    }

    /// Draw `text` with its line top at (`x`, `y`).
    pub fn draw(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, px: f32, text: &str) {
        draw_text_mut(canvas, color, x, y, PxScale::from(px), &self.font, text);
    }
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}
