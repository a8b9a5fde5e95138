//! Image decoding for raster and camera RAW inputs.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::path::{Path, PathBuf};

use crate::config::ProcessingConfig;
use crate::error::PipelineError;

/// Whether a source was decoded directly or developed from RAW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Standard(ImageFormat),
    Raw,
}

/// A decoded photo, owned by the unit of work that decoded it.
pub struct SourceImage {
    /// RGB pixels
    pub image: RgbImage,
    /// File the pixels came from
    pub path: PathBuf,
    /// Decoder that produced the pixels
    pub format: SourceFormat,
}

impl SourceImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Turns a camera RAW file into RGB pixels.
pub trait RawDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<RgbImage, PipelineError>;
}

/// Develops RAW files with rawloader, falling back to the largest embedded
/// JPEG preview when the camera is not supported.
#[derive(Debug, Default, Clone, Copy)]
pub struct DevelopingRawDecoder;

impl RawDecoder for DevelopingRawDecoder {
    fn decode(&self, path: &Path) -> Result<RgbImage, PipelineError> {
        let developed = rawloader::RawLoader::new()
            .decode_file(path)
            .map_err(|e| format!("{:?}", e))
            .and_then(|raw| develop(&raw));

        match developed {
            Ok(image) => Ok(image),
            Err(develop_err) => {
                tracing::debug!(
                    "RAW development failed for {:?} ({}), trying embedded preview",
                    path,
                    develop_err
                );
                let bytes = std::fs::read(path).map_err(|e| PipelineError::RawDecode {
                    path: path.to_path_buf(),
                    message: format!("Cannot read file: {}", e),
                })?;
                let preview =
                    largest_embedded_jpeg(&bytes).ok_or_else(|| PipelineError::RawDecode {
                        path: path.to_path_buf(),
                        message: format!("{}; no embedded preview", develop_err),
                    })?;
                image::load_from_memory_with_format(preview, ImageFormat::Jpeg)
                    .map(|img| img.to_rgb8())
                    .map_err(|e| PipelineError::RawDecode {
                        path: path.to_path_buf(),
                        message: format!("{}; embedded preview unreadable: {}", develop_err, e),
                    })
            }
        }
    }
}

/// Quick half-size development: each 2x2 CFA block becomes one pixel.
///
/// Levels are normalized per channel, as-shot white balance is applied and a
/// 2.2 gamma maps the result to 8 bits. No color matrix.
fn develop(raw: &rawloader::RawImage) -> Result<RgbImage, String> {
    let (width, height, cpp) = (raw.width, raw.height, raw.cpp);
    let expected = width * height * cpp;
    let sample = |index: usize, channel: usize| -> f32 {
        match &raw.data {
            rawloader::RawImageData::Integer(values) => {
                let black = raw.blacklevels[channel] as f32;
                let white = (raw.whitelevels[channel] as f32).max(black + 1.0);
                (values[index] as f32 - black) / (white - black)
            }
            rawloader::RawImageData::Float(values) => values[index],
        }
    };
    let len = match &raw.data {
        rawloader::RawImageData::Integer(values) => values.len(),
        rawloader::RawImageData::Float(values) => values.len(),
    };
    if len < expected {
        return Err(format!("sensor data holds {} samples, expected {}", len, expected));
    }

    let green = raw.wb_coeffs[1];
    let wb: [f32; 3] = std::array::from_fn(|c| {
        let coeff = raw.wb_coeffs[c];
        if coeff.is_finite() && coeff > 0.0 && green.is_finite() && green > 0.0 {
            coeff / green
        } else {
            1.0
        }
    });
    let encode = |rgb: [f32; 3]| -> Rgb<u8> {
        Rgb(std::array::from_fn(|c| {
            ((rgb[c] * wb[c]).clamp(0.0, 1.0).powf(1.0 / 2.2) * 255.0).round() as u8
        }))
    };

    match cpp {
        3 => Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
            let base = (y as usize * width + x as usize) * 3;
            encode(std::array::from_fn(|c| sample(base + c, c)))
        })),
        1 => {
            let (out_w, out_h) = (width / 2, height / 2);
            if out_w == 0 || out_h == 0 {
                return Err(format!("sensor too small: {}x{}", width, height));
            }
            Ok(RgbImage::from_fn(out_w as u32, out_h as u32, |x, y| {
                let mut sum = [0.0f32; 3];
                let mut count = [0u32; 3];
                for (dy, dx) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                    let row = y as usize * 2 + dy;
                    let col = x as usize * 2 + dx;
                    // Second green sites report as color 3
                    let color = raw.cfa.color_at(row, col).min(3);
                    let channel = if color == 3 { 1 } else { color };
                    sum[channel] += sample(row * width + col, color);
                    count[channel] += 1;
                }
                encode(std::array::from_fn(|c| {
                    if count[c] > 0 {
                        sum[c] / count[c] as f32
                    } else {
                        0.0
                    }
                }))
            }))
        }
        other => Err(format!("unsupported {} components per pixel", other)),
    }
}

/// Find the largest well-formed JPEG stream in a RAW container.
fn largest_embedded_jpeg(buffer: &[u8]) -> Option<&[u8]> {
    const SOI: &[u8] = b"\xff\xd8\xff";

    let mut largest: Option<&[u8]> = None;
    let mut pos = 0;
    while pos + SOI.len() <= buffer.len() {
        if !buffer[pos..].starts_with(SOI) {
            pos += 1;
            continue;
        }
        match jpeg_stream_end(buffer, pos) {
            Some(end) => {
                let candidate = &buffer[pos..end];
                if largest.map_or(true, |l| candidate.len() > l.len()) {
                    largest = Some(candidate);
                }
                pos = end;
            }
            None => pos += 1,
        }
    }
    largest
}

/// Walk the marker segments of the JPEG whose SOI sits at `start` and return
/// the offset just past its EOI.
///
/// Segment payloads are skipped by their length fields, so an EXIF thumbnail
/// inside APP1 does not end the stream early.
fn jpeg_stream_end(buffer: &[u8], start: usize) -> Option<usize> {
    let mut pos = start + 2;
    loop {
        if *buffer.get(pos)? != 0xFF {
            return None;
        }
        let mut marker = *buffer.get(pos + 1)?;
        while marker == 0xFF {
            pos += 1;
            marker = *buffer.get(pos + 1)?;
        }
        pos += 2;
        match marker {
            0xD9 => return Some(pos),
            0x01 | 0xD0..=0xD7 => {}
            0x00 | 0xD8 => return None,
            _ => {
                let length = u16::from_be_bytes([*buffer.get(pos)?, *buffer.get(pos + 1)?]);
                if length < 2 {
                    return None;
                }
                pos += length as usize;
                if marker == 0xDA {
                    pos = skip_entropy_data(buffer, pos)?;
                }
            }
        }
    }
}

/// Offset of the first real marker after a scan's entropy-coded data.
fn skip_entropy_data(buffer: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        pos += buffer.get(pos..)?.iter().position(|&b| b == 0xFF)?;
        match *buffer.get(pos + 1)? {
            // Stuffed zero, restart marker or fill byte
            0x00 | 0xD0..=0xD7 | 0xFF => pos += 1,
            _ => return Some(pos),
        }
    }
}

/// Image decoder dispatching on file extension.
pub struct ImageDecoder {
    processing: ProcessingConfig,
    raw: Box<dyn RawDecoder>,
}

impl ImageDecoder {
    /// Create a decoder using the default RAW developer.
    pub fn new(processing: ProcessingConfig) -> Self {
        Self::with_raw_decoder(processing, Box::new(DevelopingRawDecoder))
    }

    /// Create a decoder with a custom RAW backend.
    pub fn with_raw_decoder(processing: ProcessingConfig, raw: Box<dyn RawDecoder>) -> Self {
        Self { processing, raw }
    }

    /// Decode the file at `path` into RGB pixels.
    pub fn decode(&self, path: &Path) -> Result<SourceImage, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        if self.processing.is_raw(ext) {
            let image = self.raw.decode(path)?;
            return Ok(SourceImage {
                image,
                path: path.to_path_buf(),
                format: SourceFormat::Raw,
            });
        }

        let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        let (image, format) = Self::decode_bytes_sync(bytes, path)?;
        Ok(SourceImage {
            image: image.to_rgb8(),
            path: path.to_path_buf(),
            format: SourceFormat::Standard(format),
        })
    }

    /// Decode a raster image from bytes, detecting the format by content.
    fn decode_bytes_sync(
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<(DynamicImage, ImageFormat), PipelineError> {
        use std::io::Cursor;

        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?,
        };
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok((image, format))
    }
}
