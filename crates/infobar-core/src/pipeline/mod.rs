//! Image processing pipeline components.
//!
//! - **discovery**: Find supported files in the input directory
//! - **decode**: Load raster images and develop camera RAW files
//! - **metadata**: Resolve EXIF tags into capture metadata
//! - **processor**: Decode, compose and write one file
//! - **batch**: Run many files with bounded concurrency

pub mod batch;
pub mod decode;
pub mod discovery;
pub mod metadata;
pub mod processor;

// Re-exports for convenient access
pub use batch::{run_units, BatchRunner};
pub use decode::{DevelopingRawDecoder, ImageDecoder, RawDecoder, SourceFormat, SourceImage};
pub use discovery::{DiscoveredFile, Discovery, FileDiscovery};
pub use metadata::{MetadataExtractor, TagMap, TagReader};
pub use processor::{ImageProcessor, OutputDir};
