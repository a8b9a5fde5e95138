//! Finding the photos to annotate in an input directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::error::PipelineError;

/// Finds supported files directly inside a directory.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Files to process plus those left out because their output name was taken.
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<DiscoveredFile>,
    pub duplicates: Vec<PathBuf>,
}

impl FileDiscovery {
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// List supported files in `dir`, sorted by path, one per file stem.
    ///
    /// Subdirectories are not entered. When two files share a stem (say
    /// `a.png` and `a.cr2`) the first in path order wins.
    pub fn discover(&self, dir: &Path) -> Result<Discovery, PipelineError> {
        if !dir.is_dir() {
            return Err(PipelineError::InputNotFound(dir.to_path_buf()));
        }
        std::fs::read_dir(dir).map_err(|e| PipelineError::InputUnreadable {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut found: Vec<DiscoveredFile> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && self.is_supported(e.path()))
            .filter_map(|e| {
                let size = e.metadata().ok()?.len();
                Some(DiscoveredFile {
                    path: e.into_path(),
                    size,
                })
            })
            .collect();

        // Sort by path for deterministic ordering
        found.sort_by(|a, b| a.path.cmp(&b.path));

        let mut stems = HashSet::new();
        let mut discovery = Discovery::default();
        for file in found {
            let stem = file.path.file_stem().map(|s| s.to_os_string());
            if stems.insert(stem) {
                discovery.files.push(file);
            } else {
                tracing::warn!(
                    "Skipping {:?}: another file already writes the same output name",
                    file.path
                );
                discovery.duplicates.push(file.path);
            }
        }
        Ok(discovery)
    }

    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.config.accepts(ext))
    }

}

impl Discovery {
    /// Total size of the files to process, in bytes.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_is_supported() {
        let discovery = FileDiscovery::new(ProcessingConfig::default());

        assert!(discovery.is_supported(Path::new("test.jpg")));
        assert!(discovery.is_supported(Path::new("test.JPG")));
        assert!(discovery.is_supported(Path::new("test.tiff")));
        assert!(discovery.is_supported(Path::new("test.Cr2")));
        assert!(discovery.is_supported(Path::new("test.raf")));
        assert!(!discovery.is_supported(Path::new("test.webp")));
        assert!(!discovery.is_supported(Path::new("test.txt")));
        assert!(!discovery.is_supported(Path::new("noext")));
    }

    #[test]
    fn test_discover_sorted_and_flat() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "c.PNG");
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "b.nef");
        touch(dir.path(), "notes.txt");
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "d.jpg");
        std::fs::create_dir(dir.path().join("folder.jpg")).unwrap();

        let found = FileDiscovery::new(ProcessingConfig::default())
            .discover(dir.path())
            .unwrap();
        let names: Vec<_> = found
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.nef", "c.PNG"]);
        assert!(found.duplicates.is_empty());
        assert_eq!(found.total_size(), 3);
    }

    #[test]
    fn test_duplicate_stems_keep_first() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "shot.png");
        touch(dir.path(), "shot.cr2");
        touch(dir.path(), "other.jpg");

        let found = FileDiscovery::new(ProcessingConfig::default())
            .discover(dir.path())
            .unwrap();
        assert_eq!(found.files.len(), 2);
        assert!(found.files.iter().any(|f| f.path.ends_with("shot.cr2")));
        assert_eq!(found.duplicates, vec![dir.path().join("shot.png")]);
    }

    #[test]
    fn test_missing_input_dir() {
        let err = FileDiscovery::new(ProcessingConfig::default())
            .discover(Path::new("/nonexistent/photos"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::InputNotFound(_)));
    }

    #[test]
    fn test_file_is_not_an_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.jpg");
        let result = FileDiscovery::new(ProcessingConfig::default()).discover(&dir.path().join("a.jpg"));
        assert!(matches!(result, Err(PipelineError::InputNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_input_dir_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        touch(&locked, "a.jpg");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through permission bits
        let listable = std::fs::read_dir(&locked).is_ok();
        let result = FileDiscovery::new(ProcessingConfig::default()).discover(&locked);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        if listable {
            return;
        }

        let err = result.unwrap_err();
        assert!(matches!(err, PipelineError::InputUnreadable { .. }));
        assert_eq!(err.stage(), "input");
        assert!(err.to_string().contains("locked"));
    }
}
