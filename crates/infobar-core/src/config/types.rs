//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Maximum number of files processed at the same time
    pub max_workers: usize,

    /// Raster formats decoded directly
    pub supported_formats: Vec<String>,

    /// Camera RAW formats developed before annotation
    pub raw_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_workers: 32,
            supported_formats: ["png", "jpg", "jpeg", "tiff", "bmp", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            raw_formats: ["cr2", "arw", "nef", "rw2", "raf"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ProcessingConfig {
    /// Whether `ext` names a RAW format (case-insensitive).
    pub fn is_raw(&self, ext: &str) -> bool {
        self.raw_formats.iter().any(|f| f.eq_ignore_ascii_case(ext))
    }

    /// Whether `ext` is accepted at all, raster or RAW (case-insensitive).
    pub fn accepts(&self, ext: &str) -> bool {
        self.is_raw(ext)
            || self
                .supported_formats
                .iter()
                .any(|f| f.eq_ignore_ascii_case(ext))
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving `<stem>.jpg` files, relative to the working directory
    pub dir: PathBuf,

    /// JPEG quality for the annotated images (1-100)
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            jpeg_quality: 95,
        }
    }
}

/// Font files for the four text roles drawn into the bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Capture summary line ("ISO-100 | F/2.8 | ...")
    pub summary: String,

    /// Camera model label next to the logo
    pub model: String,

    /// Capture date and time
    pub timestamp: String,

    /// Copyright or default signature
    pub signature: String,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            summary: "~/.infobar/fonts/summary.ttf".to_string(),
            model: "~/.infobar/fonts/model.ttf".to_string(),
            timestamp: "~/.infobar/fonts/timestamp.ttf".to_string(),
            signature: "~/.infobar/fonts/signature.ttf".to_string(),
        }
    }
}

/// Bundled asset locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding `<Make>.jpg` camera logos
    pub logo_dir: String,

    /// Font files
    pub fonts: FontsConfig,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            logo_dir: "~/.infobar/logos".to_string(),
            fonts: FontsConfig::default(),
        }
    }
}

/// Fallback strings drawn when a tag is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// Shown for a missing ISO, aperture, exposure or focal length
    pub unknown: String,

    /// Shown when no capture timestamp was recorded
    pub unknown_time: String,

    /// Attribution used when neither Copyright nor Artist is set
    pub default_signature: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            unknown: "unknown".to_string(),
            unknown_time: "unknown time".to_string(),
            default_signature: "Shot on film, developed in code".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
