//! Record assembly for discovered files
//!
//! Reads each file through the metadata reader, applies the field profile,
//! adds the derived path columns and collects the records into a dataset.
//! Reads run on the blocking pool but results are consumed in input order,
//! so the dataset is identical to a sequential run.

use super::discovery::file_extension;
use crate::config::HarvestConfig;
use crate::constants::columns;
use crate::dataset::Dataset;
use crate::error::{HarvestError, Result};
use crate::models::{Cell, ExtractionStats, FieldProfile, Record, TagMap};
use crate::reader::MetadataReader;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;
use tracing::{debug, error};

/// Build one record from a file's tags
///
/// Fails with an extraction error when the tag map is empty, or when every
/// field selected by the profile is missing.
pub fn assemble_record(path: &Path, tags: TagMap, profile: FieldProfile) -> Result<Record> {
    if tags.is_empty() {
        return Err(HarvestError::extraction(path, "no metadata tags"));
    }

    let tag_fields: Vec<(String, Cell)> = match profile.fields() {
        Some(allowed) => allowed
            .iter()
            .map(|&name| {
                let cell = tags
                    .get(name)
                    .map_or(Cell::Null, |v| Cell::Text(v.to_string()));
                (name.to_string(), cell)
            })
            .collect(),
        None => tags
            .iter()
            .map(|(name, value)| (name.to_string(), Cell::Text(value.to_string())))
            .collect(),
    };

    if tag_fields.iter().all(|(_, cell)| cell.is_null()) {
        return Err(HarvestError::extraction(
            path,
            "none of the selected fields are present",
        ));
    }

    let folder = path
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let filetype = file_extension(path).map_or(Cell::Null, Cell::Text);

    let mut fields = Vec::with_capacity(tag_fields.len() + 3);
    fields.push((columns::FOLDER.to_string(), Cell::Text(folder)));
    fields.push((columns::FILENAME.to_string(), Cell::Text(filename)));
    fields.push((columns::FILETYPE.to_string(), filetype));
    fields.extend(tag_fields);

    Ok(Record::new(fields))
}

/// Reads files and assembles them into a dataset
pub struct RecordAssembler {
    reader: Arc<dyn MetadataReader>,
    profile: FieldProfile,
    max_concurrent_files: usize,
    show_progress: bool,
}

impl RecordAssembler {
    pub fn new(reader: Arc<dyn MetadataReader>, config: &HarvestConfig) -> Self {
        Self {
            reader,
            profile: config.profile,
            max_concurrent_files: config.max_concurrent_files.max(1),
            show_progress: config.show_progress,
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Reading metadata");
        pb
    }

    /// Extract every file into a dataset
    ///
    /// Per-file failures are counted and skipped, never retried.
    pub async fn extract(&self, files: &[PathBuf]) -> (Dataset, ExtractionStats) {
        let pb = self.progress_bar(files.len());

        let results = stream::iter(files.iter().cloned())
            .map(|path| {
                let reader = Arc::clone(&self.reader);
                let profile = self.profile;
                async move {
                    let outcome = task::spawn_blocking({
                        let path = path.clone();
                        move || {
                            reader
                                .read(&path)
                                .and_then(|tags| assemble_record(&path, tags, profile))
                        }
                    })
                    .await;
                    (path, outcome)
                }
            })
            .buffered(self.max_concurrent_files);
        let mut results = std::pin::pin!(results);

        let mut dataset = Dataset::new();
        let mut stats = ExtractionStats::default();

        while let Some((path, outcome)) = results.next().await {
            stats.files_read += 1;
            pb.inc(1);

            match outcome {
                Ok(Ok(record)) => {
                    debug!("Harvested: {}", path.display());
                    dataset.append(record);
                    stats.records_kept += 1;
                }
                Ok(Err(e)) => {
                    debug!("Skipped {}: {}", path.display(), e);
                    stats.errors += 1;
                }
                Err(e) => {
                    error!("Metadata read task failed for {}: {}", path.display(), e);
                    stats.errors += 1;
                }
            }
        }

        pb.finish_with_message("Metadata read complete");
        debug!(
            "Extraction finished: {} read, {} kept, {} errors",
            stats.files_read, stats.records_kept, stats.errors
        );

        (dataset, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::tags;

    fn sample_tags() -> TagMap {
        [
            (tags::DATE_TIME_ORIGINAL, "2022:01:01 12:00:00"),
            (tags::MAKE, "Canon"),
            ("Exif.Photo.LensModel", "RF24-105mm F4 L IS USM"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_full_profile_keeps_all_tags() {
        let path = Path::new("/photos/2022/IMG_0001.CR2");
        let record = assemble_record(path, sample_tags(), FieldProfile::Full).unwrap();

        let names: Vec<&str> = record.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Folder",
                "Filename",
                "Filetype",
                tags::DATE_TIME_ORIGINAL,
                tags::MAKE,
                "Exif.Photo.LensModel"
            ]
        );
        assert_eq!(
            record.get(columns::FOLDER),
            Some(&Cell::Text("/photos/2022".to_string()))
        );
        assert_eq!(
            record.get(columns::FILENAME),
            Some(&Cell::Text("IMG_0001.CR2".to_string()))
        );
        assert_eq!(
            record.get(columns::FILETYPE),
            Some(&Cell::Text("cr2".to_string()))
        );
    }

    #[test]
    fn test_short_profile_reindexes() {
        let path = Path::new("/photos/a.jpg");
        let record = assemble_record(path, sample_tags(), FieldProfile::Short).unwrap();

        assert_eq!(record.fields().len(), 3 + 12);
        assert_eq!(record.get("Exif.Photo.LensModel"), None);
        assert_eq!(record.get(tags::FLASH), Some(&Cell::Null));
        assert_eq!(
            record.get(tags::MAKE),
            Some(&Cell::Text("Canon".to_string()))
        );
    }

    #[test]
    fn test_empty_tags_rejected() {
        let result = assemble_record(Path::new("/a.jpg"), TagMap::new(), FieldProfile::Full);
        assert!(matches!(result, Err(HarvestError::Extraction { .. })));
    }

    #[test]
    fn test_short_profile_all_null_rejected() {
        let tags: TagMap = [("Exif.Photo.LensModel", "RF50mm")].into_iter().collect();
        let result = assemble_record(Path::new("/a.jpg"), tags, FieldProfile::Short);
        assert!(matches!(result, Err(HarvestError::Extraction { .. })));
    }
}
