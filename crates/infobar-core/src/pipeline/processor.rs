//! One unit of work: decode, read metadata, compose, write.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::config::Config;
use crate::error::PipelineError;
use crate::render::{AssetCache, Compositor};

use super::decode::ImageDecoder;
use super::metadata::MetadataExtractor;

/// Output directory shared by all units, created at most once.
#[derive(Debug)]
pub struct OutputDir {
    path: PathBuf,
    ready: OnceLock<Result<(), String>>,
}

impl OutputDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ready: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory if needed; later calls return the first result.
    pub fn ensure(&self) -> Result<&Path, PipelineError> {
        let ready = self.ready.get_or_init(|| {
            std::fs::create_dir_all(&self.path).map_err(|e| e.to_string())
        });
        match ready {
            Ok(()) => Ok(&self.path),
            Err(message) => Err(PipelineError::OutputDir {
                path: self.path.clone(),
                message: message.clone(),
            }),
        }
    }

    /// Where the annotated copy of `source` is written.
    pub fn target_for(&self, source: &Path) -> PathBuf {
        let mut name = source
            .file_stem()
            .unwrap_or(source.as_os_str())
            .to_os_string();
        name.push(".jpg");
        self.path.join(name)
    }
}

/// Runs the full annotation pipeline for single files.
pub struct ImageProcessor {
    decoder: ImageDecoder,
    compositor: Compositor,
    output: Arc<OutputDir>,
    jpeg_quality: u8,
}

impl ImageProcessor {
    pub fn new(config: &Config, assets: Arc<AssetCache>, output: Arc<OutputDir>) -> Self {
        Self::with_decoder(
            ImageDecoder::new(config.processing.clone()),
            config,
            assets,
            output,
        )
    }

    /// Build a processor around a preconfigured decoder.
    pub fn with_decoder(
        decoder: ImageDecoder,
        config: &Config,
        assets: Arc<AssetCache>,
        output: Arc<OutputDir>,
    ) -> Self {
        Self {
            decoder,
            compositor: Compositor::new(assets, config.labels.clone()),
            output,
            jpeg_quality: config.output.jpeg_quality,
        }
    }

    pub fn output_dir(&self) -> &OutputDir {
        &self.output
    }

    /// Annotate one photo and return the path written.
    ///
    /// Blocking; the batch runner calls this on the blocking pool.
    pub fn process(&self, path: &Path) -> Result<PathBuf, PipelineError> {
        let start = Instant::now();
        tracing::debug!("Processing: {:?}", path);

        let decode_start = Instant::now();
        let source = self.decoder.decode(path)?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        let metadata_start = Instant::now();
        let metadata = MetadataExtractor::extract(path);
        tracing::trace!("  Metadata: {:?}", metadata_start.elapsed());

        let compose_start = Instant::now();
        let composite = self.compositor.compose(&source.image, &metadata);
        tracing::trace!(
            "  Compose: {:?} (text: {}, logo: {}, label: {})",
            compose_start.elapsed(),
            composite.layers.text,
            composite.layers.logo,
            composite.layers.model_label
        );

        let encode_start = Instant::now();
        self.output.ensure()?;
        let target = self.output.target_for(path);
        self.write_jpeg(&composite.image, &target)?;
        tracing::trace!("  Encode: {:?}", encode_start.elapsed());

        tracing::debug!(
            "Wrote {:?} in {:?} ({}x{})",
            target,
            start.elapsed(),
            composite.image.width(),
            composite.image.height()
        );
        Ok(target)
    }

    fn write_jpeg(&self, image: &RgbImage, target: &Path) -> Result<(), PipelineError> {
        let encode_err = |message: String| PipelineError::Encode {
            path: target.to_path_buf(),
            message,
        };
        let file = std::fs::File::create(target).map_err(|e| encode_err(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality)
            .encode_image(image)
            .map_err(|e| encode_err(e.to_string()))?;
        writer
            .into_inner()
            .map_err(|e| encode_err(e.to_string()))?
            .sync_all()
            .map_err(|e| encode_err(e.to_string()))
    }
}
