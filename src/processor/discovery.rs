//! File discovery module for image trees
//!
//! Walks the walk directory recursively and collects every file whose
//! extension is a supported image format.

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::error::{HarvestError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File discovery component for image trees
#[derive(Debug)]
pub struct FileDiscovery {
    root: PathBuf,
}

impl FileDiscovery {
    /// Create a discovery rooted at an existing directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(HarvestError::InvalidPath {
                path: root.to_path_buf(),
            });
        }

        Ok(Self {
            root: std::path::absolute(root)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover all supported image files below the root
    ///
    /// Paths are absolute and come back in directory traversal order.
    /// Symbolic links to directories are not followed; symbolic links to
    /// files are included.
    pub fn discover_images(&self) -> Vec<PathBuf> {
        debug!("Searching for images in: {}", self.root.display());

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file && is_supported_image(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} image files", files.len());
        files
    }
}

/// Lower-cased extension without the dot
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Check if a path has a supported image extension (case-insensitive)
pub fn is_supported_image(path: &Path) -> bool {
    file_extension(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}
