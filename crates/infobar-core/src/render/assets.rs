//! Fonts and camera logos, loaded once before a batch starts.
//!
//! The cache is immutable after construction and shared between workers
//! through an `Arc`, so no unit of work touches the disk for assets.

use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::text::Typeface;
use crate::config::Config;
use crate::error::AssetError;

/// The four text roles drawn into the bar, each with its own font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Summary,
    Model,
    Timestamp,
    Signature,
}

impl FontRole {
    pub const ALL: [FontRole; 4] = [
        FontRole::Summary,
        FontRole::Model,
        FontRole::Timestamp,
        FontRole::Signature,
    ];
}

const LOGO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Read-only store of fonts and logos.
#[derive(Debug, Default)]
pub struct AssetCache {
    fonts: HashMap<FontRole, Typeface>,
    logos: HashMap<String, RgbaImage>,
}

impl AssetCache {
    /// A cache with no fonts and no logos; only the gradient bar is drawn.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every configured font and every logo in the logo directory.
    ///
    /// Missing or broken assets are logged and left out.
    pub fn load(config: &Config) -> Self {
        let mut cache = Self::empty();
        for (role, path) in FontRole::ALL.into_iter().zip(config.font_paths()) {
            match Typeface::from_file(&path) {
                Ok(face) => {
                    cache.fonts.insert(role, face);
                }
                Err(e) => tracing::warn!("{e}; {:?} text will not be drawn", role),
            }
        }

        let logo_dir = config.logo_dir();
        match Self::load_logos(&logo_dir) {
            Ok(logos) => cache.logos = logos,
            Err(e) => tracing::warn!("Cannot read logo directory {:?}: {}", logo_dir, e),
        }

        tracing::debug!(
            "Asset cache: {} font(s), {} logo(s)",
            cache.fonts.len(),
            cache.logos.len()
        );
        cache
    }

    /// Decode all logos in `dir`, keyed by file stem.
    fn load_logos(dir: &Path) -> std::io::Result<HashMap<String, RgbaImage>> {
        let mut logos = HashMap::new();
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| LOGO_EXTENSIONS.iter().any(|l| l.eq_ignore_ascii_case(e)))
            })
            .collect();
        // "<Make>.jpg" takes precedence over other extensions of the same stem
        entries.sort_by_key(|p| {
            let ext = p
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_ascii_lowercase();
            LOGO_EXTENSIONS.iter().position(|l| *l == ext)
        });

        for path in entries {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if logos.contains_key(stem) {
                continue;
            }
            match Self::decode_logo(&path) {
                Ok(logo) => {
                    logos.insert(stem.to_string(), logo);
                }
                Err(e) => tracing::warn!("{e}"),
            }
        }
        Ok(logos)
    }

    fn decode_logo(path: &Path) -> Result<RgbaImage, AssetError> {
        image::open(path)
            .map(|img| img.to_rgba8())
            .map_err(|e| AssetError::Logo {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Add a font for `role`, replacing any previous one.
    pub fn with_font(mut self, role: FontRole, face: Typeface) -> Self {
        self.fonts.insert(role, face);
        self
    }

    /// Add a logo for the manufacturer `make`.
    pub fn with_logo(mut self, make: impl Into<String>, logo: RgbaImage) -> Self {
        self.logos.insert(make.into(), logo);
        self
    }

    pub fn font(&self, role: FontRole) -> Option<&Typeface> {
        self.fonts.get(&role)
    }

    /// Logo whose name equals the trimmed `make` exactly.
    pub fn logo(&self, make: &str) -> Option<&RgbaImage> {
        self.logos.get(make.trim())
    }

    pub fn logo_count(&self) -> usize {
        self.logos.len()
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_logo_lookup_is_exact() {
        let cache = AssetCache::empty().with_logo("Canon", RgbaImage::new(4, 2));
        assert!(cache.logo("Canon").is_some());
        assert!(cache.logo("Canon  ").is_some());
        assert!(cache.logo("canon").is_none());
        assert!(cache.logo("NIKON CORPORATION").is_none());
    }

    #[test]
    fn test_load_logos_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(6, 3, Rgba([1, 2, 3, 255]))
            .save(dir.path().join("SONY.png"))
            .unwrap();
        image::RgbImage::new(8, 4)
            .save(dir.path().join("FUJIFILM.jpg"))
            .unwrap();
        image::RgbImage::new(2, 2)
            .save(dir.path().join("FUJIFILM.png"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        std::fs::write(dir.path().join("Broken.jpg"), "not a jpeg").unwrap();

        let logos = AssetCache::load_logos(dir.path()).unwrap();
        assert_eq!(logos.len(), 2);
        assert_eq!(logos["SONY"].dimensions(), (6, 3));
        assert_eq!(logos["FUJIFILM"].dimensions(), (8, 4));
    }

    #[test]
    fn test_load_with_missing_assets_is_empty() {
        let mut config = Config::default();
        config.assets.logo_dir = "/nonexistent/logos".to_string();
        config.assets.fonts.summary = "/nonexistent/a.ttf".to_string();
        config.assets.fonts.model = "/nonexistent/b.ttf".to_string();
        config.assets.fonts.timestamp = "/nonexistent/c.ttf".to_string();
        config.assets.fonts.signature = "/nonexistent/d.ttf".to_string();

        let cache = AssetCache::load(&config);
        assert_eq!(cache.font_count(), 0);
        assert_eq!(cache.logo_count(), 0);
    }
}
