//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.max_workers must be > 0".into(),
            ));
        }
        if self.processing.supported_formats.is_empty() && self.processing.raw_formats.is_empty()
        {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats and processing.raw_formats cannot both be empty"
                    .into(),
            ));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(ConfigError::ValidationError(
                "output.jpeg_quality must be between 1 and 100".into(),
            ));
        }
        if self.output.dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "output.dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}
