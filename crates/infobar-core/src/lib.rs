//! Infobar Core - batch photo annotation library.
//!
//! Infobar appends an information bar to the bottom of each photo in a
//! directory: capture settings and time on the left, the manufacturer logo
//! and model on the right, over a soft gradient that feathers into the image.
//!
//! # Architecture
//!
//! ```text
//! Discover → Decode (raster / RAW) → Metadata → Compose bar → JPEG
//! ```
//!
//! Fonts and logos are loaded once into an [`AssetCache`] and shared by all
//! workers; every file is an independent unit of work.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infobar_core::{AssetCache, BatchRunner, Config};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> infobar_core::Result<()> {
//!     let config = Config::load()?;
//!     let assets = Arc::new(AssetCache::load(&config));
//!     let runner = BatchRunner::new(&config, assets);
//!
//!     let report = runner.run("./photos".as_ref(), |_| {}).await?;
//!     println!("{} written, {} failed", report.succeeded(), report.failed());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{AssetError, ConfigError, InfobarError, PipelineError, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{BatchRunner, ImageProcessor};
pub use render::{AssetCache, Compositor};
pub use types::{BatchReport, CaptureMetadata, JobOutcome, Orientation};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
