//! Two-color gradient buffers for the bar background.

use image::{imageops, Rgb, RgbImage};

/// Quarter-turn rotations applied to a finished gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// Rotation for an angle in degrees; only multiples of 90 are accepted.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Self::None),
            90 => Some(Self::Quarter),
            180 => Some(Self::Half),
            270 => Some(Self::ThreeQuarter),
            _ => None,
        }
    }
}

/// Builds horizontal gradients between two colors.
#[derive(Debug, Clone, Copy)]
pub struct GradientSynthesizer {
    pub start: Rgb<u8>,
    pub end: Rgb<u8>,
}

impl GradientSynthesizer {
    pub fn new(start: Rgb<u8>, end: Rgb<u8>) -> Self {
        Self { start, end }
    }

    /// Render a `width` x `height` gradient, then rotate it as a whole.
    ///
    /// Column `x` gets `start + (end - start) * x / width`; all rows are equal.
    pub fn render(&self, width: u32, height: u32, rotation: Rotation) -> RgbImage {
        let row: Vec<Rgb<u8>> = (0..width)
            .map(|x| self.color_at(x as f32 / width as f32))
            .collect();
        let image = RgbImage::from_fn(width, height, |x, _| row[x as usize]);

        match rotation {
            Rotation::None => image,
            Rotation::Quarter => imageops::rotate90(&image),
            Rotation::Half => imageops::rotate180(&image),
            Rotation::ThreeQuarter => imageops::rotate270(&image),
        }
    }

    fn color_at(&self, t: f32) -> Rgb<u8> {
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb([
            lerp(self.start[0], self.end[0]),
            lerp(self.start[1], self.end[1]),
            lerp(self.start[2], self.end[2]),
        ])
    }
}
