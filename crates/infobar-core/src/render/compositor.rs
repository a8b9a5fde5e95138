//! Assembles the annotated image: photo, feathered bar, text and logo.

use image::{imageops, GrayImage, Rgb, RgbImage, RgbaImage};
use std::sync::Arc;

use super::assets::{AssetCache, FontRole};
use super::feather::FeatherMask;
use super::gradient::{GradientSynthesizer, Rotation};
use super::layout::BarGeometry;
use crate::config::LabelsConfig;
use crate::types::CaptureMetadata;

const BAR_LIGHT: Rgb<u8> = Rgb([255, 255, 255]);
const BAR_SHADE: Rgb<u8> = Rgb([226, 226, 226]);

const SUMMARY_COLOR: Rgb<u8> = Rgb([38, 38, 38]);
const TIMESTAMP_COLOR: Rgb<u8> = Rgb([112, 112, 112]);
const SIGNATURE_COLOR: Rgb<u8> = Rgb([176, 36, 48]);
const MODEL_COLOR: Rgb<u8> = Rgb([24, 24, 24]);

/// Model label size as a share of the bar height.
const MODEL_PX_RATIO: f32 = 0.28;

/// Which optional layers ended up on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Layers {
    pub text: bool,
    pub logo: bool,
    pub model_label: bool,
}

/// A finished canvas and how it was laid out.
pub struct Composite {
    pub image: RgbImage,
    pub geometry: BarGeometry,
    pub layers: Layers,
}

/// Draws the information bar onto photos.
pub struct Compositor {
    assets: Arc<AssetCache>,
    labels: LabelsConfig,
    gradient: GradientSynthesizer,
}

impl Compositor {
    pub fn new(assets: Arc<AssetCache>, labels: LabelsConfig) -> Self {
        Self {
            assets,
            labels,
            gradient: GradientSynthesizer::new(BAR_LIGHT, BAR_SHADE),
        }
    }

    /// Build the annotated canvas for `source`.
    pub fn compose(&self, source: &RgbImage, meta: &CaptureMetadata) -> Composite {
        let geometry = BarGeometry::for_source(source.width(), source.height());
        let mut canvas =
            RgbImage::from_pixel(geometry.canvas_width, geometry.canvas_height, BAR_LIGHT);
        imageops::replace(&mut canvas, source, 0, 0);

        let mut layers = Layers::default();
        if geometry.bar_height == 0 {
            return Composite {
                image: canvas,
                geometry,
                layers,
            };
        }

        let bar = self
            .gradient
            .render(geometry.canvas_width, geometry.bar_height, Rotation::Half);
        let mask = FeatherMask::generate(geometry.canvas_width, geometry.bar_height, geometry.feather);
        blend_masked(&mut canvas, &bar, &mask, geometry.bar_top);

        if geometry.orientation.shows_text() {
            layers.text = self.draw_text(&mut canvas, &geometry, meta);
        }

        if let Some(logo_x) = self.draw_logo(&mut canvas, &geometry, meta) {
            layers.logo = true;
            layers.model_label = self.draw_model_label(&mut canvas, &geometry, meta, logo_x);
        }

        Composite {
            image: canvas,
            geometry,
            layers,
        }
    }

    /// Summary line, then timestamp and signature sharing a baseline.
    fn draw_text(&self, canvas: &mut RgbImage, geometry: &BarGeometry, meta: &CaptureMetadata) -> bool {
        let layout = geometry.text_layout();
        if layout.summary_px < 1.0 {
            return false;
        }
        let mut drawn = false;

        if let Some(face) = self.assets.font(FontRole::Summary) {
            face.draw(
                canvas,
                SUMMARY_COLOR,
                layout.margin_x as i32,
                layout.summary_top as i32,
                layout.summary_px,
                &meta.summary_line(&self.labels),
            );
            drawn = true;
        }

        let mut x = layout.margin_x;
        let mut baseline = layout.second_line_top as f32;
        if let Some(face) = self.assets.font(FontRole::Timestamp) {
            let timestamp = meta.timestamp_display(&self.labels.unknown_time);
            face.draw(
                canvas,
                TIMESTAMP_COLOR,
                x as i32,
                layout.second_line_top as i32,
                layout.timestamp_px,
                &timestamp,
            );
            let (width, _) = face.measure(&timestamp, layout.timestamp_px);
            x += width as i64 + layout.signature_gap;
            baseline += face.ascent(layout.timestamp_px);
            drawn = true;
        }

        if let Some(face) = self.assets.font(FontRole::Signature) {
            let top = if baseline > layout.second_line_top as f32 {
                baseline - face.ascent(layout.signature_px)
            } else {
                layout.second_line_top as f32
            };
            face.draw(
                canvas,
                SIGNATURE_COLOR,
                x as i32,
                top.round() as i32,
                layout.signature_px,
                meta.signature(&self.labels),
            );
            drawn = true;
        }
        drawn
    }

    /// Paste the manufacturer logo; returns its left edge when placed.
    fn draw_logo(&self, canvas: &mut RgbImage, geometry: &BarGeometry, meta: &CaptureMetadata) -> Option<i64> {
        let make = meta.camera_make.as_deref()?;
        let Some(logo) = self.assets.logo(make) else {
            tracing::debug!("No logo for make {:?}", make);
            return None;
        };
        let (width, height) = geometry.logo_size(logo.width(), logo.height())?;
        let scaled = imageops::resize(logo, width, height, imageops::FilterType::Lanczos3);
        let (x, y) = geometry.logo_origin(width, height);
        paste_with_alpha(canvas, &scaled, x, y);
        Some(x)
    }

    fn draw_model_label(
        &self,
        canvas: &mut RgbImage,
        geometry: &BarGeometry,
        meta: &CaptureMetadata,
        logo_x: i64,
    ) -> bool {
        let Some(face) = self.assets.font(FontRole::Model) else {
            return false;
        };
        let Some(label) = meta.model_label() else {
            return false;
        };
        let px = geometry.font_px(MODEL_PX_RATIO);
        if px < 1.0 {
            return false;
        }
        let (width, height) = face.measure(&label, px);
        let (x, y) = geometry.model_label_origin(logo_x, width, height);
        face.draw(canvas, MODEL_COLOR, x as i32, y as i32, px, &label);
        true
    }
}

/// Blend `top` into `canvas` starting at row `y0`, weighting each pixel by `mask`.
pub fn blend_masked(canvas: &mut RgbImage, top: &RgbImage, mask: &GrayImage, y0: u32) {
    let width = top.width().min(canvas.width()).min(mask.width());
    let rows = top
        .height()
        .min(mask.height())
        .min(canvas.height().saturating_sub(y0));
    for y in 0..rows {
        for x in 0..width {
            let alpha = mask.get_pixel(x, y)[0];
            let under = canvas.get_pixel_mut(x, y0 + y);
            *under = mix(*under, *top.get_pixel(x, y), alpha);
        }
    }
}

/// Paste an RGBA image at (`x`, `y`) using its alpha as the mask; clipped to the canvas.
pub fn paste_with_alpha(canvas: &mut RgbImage, top: &RgbaImage, x: i64, y: i64) {
    for (tx, ty, px) in top.enumerate_pixels() {
        let cx = x + tx as i64;
        let cy = y + ty as i64;
        if cx < 0 || cy < 0 || cx >= canvas.width() as i64 || cy >= canvas.height() as i64 {
            continue;
        }
        let under = canvas.get_pixel_mut(cx as u32, cy as u32);
        *under = mix(*under, Rgb([px[0], px[1], px[2]]), px[3]);
    }
}

fn mix(under: Rgb<u8>, over: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let a = alpha as u32;
    let channel = |u: u8, o: u8| ((u as u32 * (255 - a) + o as u32 * a + 127) / 255) as u8;
    Rgb([
        channel(under[0], over[0]),
        channel(under[1], over[1]),
        channel(under[2], over[2]),
    ])
}
