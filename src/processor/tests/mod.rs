//! Scenario tests for the processor module
//!
//! Runs the complete harvest pipeline over temporary image trees, with an
//! in-memory metadata reader standing in for EXIF decoding.

pub mod basic_processing;

use crate::error::{HarvestError, Result};
use crate::models::TagMap;
use crate::reader::MetadataReader;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Reader returning canned tags keyed by file name
#[derive(Debug, Default)]
pub struct StaticReader {
    tags: HashMap<String, TagMap>,
}

impl StaticReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file<'a>(
        mut self,
        filename: &str,
        tags: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        self.tags
            .insert(filename.to_string(), tags.into_iter().collect());
        self
    }
}

impl MetadataReader for StaticReader {
    fn read(&self, path: &Path) -> Result<TagMap> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.tags
            .get(&name)
            .cloned()
            .ok_or_else(|| HarvestError::extraction(path, "no EXIF data"))
    }
}

/// Create empty files under `<temp>/photos` and return the walk directory
pub fn create_photo_tree(root: &Path, files: &[&str]) -> PathBuf {
    let walk_dir = root.join("photos");
    fs::create_dir_all(&walk_dir).unwrap();
    for file in files {
        let path = walk_dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "image").unwrap();
    }
    walk_dir
}

/// Read a TAB-delimited report into rows of fields
pub fn read_report(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

/// Column values by header name
pub fn report_column(report: &[Vec<String>], name: &str) -> Vec<String> {
    let idx = report[0]
        .iter()
        .position(|h| h == name)
        .unwrap_or_else(|| panic!("missing column {}", name));
    report[1..].iter().map(|row| row[idx].clone()).collect()
}
