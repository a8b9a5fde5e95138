//! EXIF metadata extraction.
//!
//! Reading is split in two: [`TagReader`] turns the primary IFD into a flat
//! `name -> raw value` map, and [`MetadataExtractor`] resolves the fields the
//! bar needs from that map exactly once per file.

use exif::{Field, In, Reader, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::types::CaptureMetadata;

/// Raw tag values keyed by EXIF tag name ("FNumber", "Model", ...).
pub type TagMap = BTreeMap<String, String>;

/// Reads EXIF tags from image files as plain strings.
pub struct TagReader;

impl TagReader {
    /// Read all primary-image tags from `path`.
    ///
    /// Returns an empty map if the file has no EXIF data or cannot be read.
    pub fn read_tags(path: &Path) -> TagMap {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::debug!("Cannot open {:?} for EXIF: {}", path, e);
                return TagMap::new();
            }
        };
        let mut reader = BufReader::new(file);
        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(e) => {
                tracing::debug!("No EXIF in {:?}: {}", path, e);
                return TagMap::new();
            }
        };

        exif.fields()
            .filter(|f| f.ifd_num == In::PRIMARY)
            .filter_map(|f| Self::raw_value(f).map(|v| (f.tag.to_string(), v)))
            .collect()
    }

    /// Render a field the way it is stored: fractions stay fractions.
    fn raw_value(field: &Field) -> Option<String> {
        let value = match &field.value {
            Value::Ascii(parts) => parts
                .iter()
                .map(|p| String::from_utf8_lossy(p).trim_matches(char::from(0)).trim().to_string())
                .find(|s| !s.is_empty())?,
            Value::Short(v) => v.first()?.to_string(),
            Value::Long(v) => v.first()?.to_string(),
            Value::Rational(v) => {
                let r = v.first()?;
                fraction(r.num as i64, r.denom as i64)
            }
            Value::SRational(v) => {
                let r = v.first()?;
                fraction(r.num as i64, r.denom as i64)
            }
            _ => field.display_value().to_string(),
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Reduce `num/den`, dropping the denominator when it is 1.
fn fraction(num: i64, den: i64) -> String {
    if den == 0 {
        return format!("{}/{}", num, den);
    }
    let g = gcd(num.unsigned_abs(), den.unsigned_abs()).max(1) as i64;
    let (n, d) = (num / g, den / g);
    if d == 1 {
        n.to_string()
    } else {
        format!("{}/{}", n, d)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Resolves [`CaptureMetadata`] from image files.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract capture metadata from an image file.
    ///
    /// Never fails: unreadable files and missing tags yield empty fields.
    pub fn extract(path: &Path) -> CaptureMetadata {
        let tags = TagReader::read_tags(path);
        let metadata = Self::from_tags(&tags);
        Self::log_missing(path, &metadata);
        metadata
    }

    /// Resolve the pipeline's fields from a raw tag map.
    pub fn from_tags(tags: &TagMap) -> CaptureMetadata {
        CaptureMetadata {
            iso: Self::first(tags, &["PhotographicSensitivity", "ISOSpeedRatings"])
                .and_then(|v| v.parse().ok()),
            aperture: Self::first(tags, &["FNumber"]),
            exposure_time: Self::first(tags, &["ExposureTime"]),
            focal_length: Self::first(tags, &["FocalLength"]),
            camera_make: Self::first(tags, &["Make"]),
            camera_model: Self::first(tags, &["Model"]),
            captured_at: Self::first(tags, &["DateTimeOriginal", "DateTime"]),
            attribution: Self::first(tags, &["Copyright", "Artist"]),
        }
    }

    /// First non-empty value among `keys`, in order.
    fn first(tags: &TagMap, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| tags.get(*k))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn log_missing(path: &Path, m: &CaptureMetadata) {
        let fields = [
            ("iso", m.iso.is_none()),
            ("aperture", m.aperture.is_none()),
            ("exposure_time", m.exposure_time.is_none()),
            ("focal_length", m.focal_length.is_none()),
            ("make", m.camera_make.is_none()),
            ("model", m.camera_model.is_none()),
            ("timestamp", m.captured_at.is_none()),
            ("attribution", m.attribution.is_none()),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            tracing::debug!("{:?}: no {}", path, missing.join(", "));
        }
    }
}
