//! Error types for the infobar annotation pipeline.
//!
//! Errors are organized by stage so a failed unit of work can be reported
//! with the file it concerned and the kind of failure.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for infobar operations.
#[derive(Error, Debug)]
pub enum InfobarError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The batch input directory is missing or not a directory
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),

    /// The batch input directory exists but cannot be listed
    #[error("Cannot read input directory {path}: {message}")]
    InputUnreadable { path: PathBuf, message: String },

    /// The output directory could not be created
    #[error("Cannot prepare output directory {path}: {message}")]
    OutputDir { path: PathBuf, message: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Standard raster decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// RAW development failed and no embedded preview was usable
    #[error("RAW decode error for {path}: {message}")]
    RawDecode { path: PathBuf, message: String },

    /// Writing the annotated image failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// The worker running this file panicked or was aborted
    #[error("Worker failed for {path}: {message}")]
    Worker { path: PathBuf, message: String },
}

impl PipelineError {
    /// Short name of the stage that failed, used in logs and run reports.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) | Self::InputUnreadable { .. } => "input",
            Self::OutputDir { .. } => "output-dir",
            Self::FileNotFound(_) => "open",
            Self::UnsupportedFormat { .. } => "format",
            Self::Decode { .. } => "decode",
            Self::RawDecode { .. } => "raw-decode",
            Self::Encode { .. } => "encode",
            Self::Worker { .. } => "worker",
        }
    }
}

/// Errors raised while loading fonts and logos into the asset cache.
///
/// These never fail a batch: the cache logs them and leaves the slot empty.
#[derive(Error, Debug)]
pub enum AssetError {
    /// A font file was missing or not a valid TrueType/OpenType font
    #[error("Cannot load font {path}: {message}")]
    Font { path: PathBuf, message: String },

    /// A logo image could not be decoded
    #[error("Cannot load logo {path}: {message}")]
    Logo { path: PathBuf, message: String },
}

/// Convenience type alias for infobar results.
pub type Result<T> = std::result::Result<T, InfobarError>;
