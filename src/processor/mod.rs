//! Main harvest engine.
//!
//! Orchestrates one harvest run: file discovery, metadata extraction,
//! the cleaning passes, and writing the report.

pub mod assembler;
pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{assembler::RecordAssembler, discovery::FileDiscovery, writer::ReportWriter};

use crate::cleaning::{
    deduplicate_by_timestamp, derive_horizontal, evaluate_fields, parse_timestamps, trim_strings,
};
use crate::config::HarvestConfig;
use crate::constants::SHORT_NAME_PATTERN;
use crate::dataset::Dataset;
use crate::error::{HarvestError, Result};
use crate::models::{FieldProfile, HarvestSummary};
use crate::reader::{ExifReader, MetadataReader};

use colored::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Main processor for a harvest run
pub struct HarvestProcessor {
    discovery: FileDiscovery,
    writer: ReportWriter,
    config: HarvestConfig,
    reader: Arc<dyn MetadataReader>,
}

impl HarvestProcessor {
    /// Create a processor reading EXIF data with the default reader
    pub fn new(
        walk_dir: impl AsRef<Path>,
        output_path: PathBuf,
        config: HarvestConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            discovery: FileDiscovery::new(walk_dir)?,
            writer: ReportWriter::new(output_path, &config),
            config,
            reader: Arc::new(ExifReader::new()),
        })
    }

    /// Swap the metadata reader
    pub fn with_reader(mut self, reader: Arc<dyn MetadataReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn output_path(&self) -> &Path {
        self.writer.output_path()
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<HarvestSummary> {
        let start_time = Instant::now();
        println!("{}", "Starting EXIF harvest".bright_green().bold());
        println!(
            "  {} {}",
            "Walk directory:".bright_cyan(),
            self.discovery.root().display()
        );
        println!(
            "  {} {}",
            "Report:".bright_cyan(),
            self.output_path().display()
        );

        // Step 1: Discover image files
        let files = self.discovery.discover_images();
        if files.is_empty() {
            return Err(HarvestError::NoCandidates {
                path: self.discovery.root().to_path_buf(),
            });
        }
        println!(
            "  {} {} image files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        // Step 2: Refuse to do any work if the report cannot be written
        self.writer.check_destination()?;

        // Step 3: Extract metadata
        let assembler = RecordAssembler::new(Arc::clone(&self.reader), &self.config);
        let (mut dataset, stats) = assembler.extract(&files).await;
        if dataset.is_empty() {
            return Err(HarvestError::EmptyDataset);
        }

        // Step 4: Clean
        let mut summary = HarvestSummary {
            files_found: files.len(),
            errors: stats.errors,
            output_path: self.output_path().to_path_buf(),
            ..Default::default()
        };
        self.clean(&mut dataset, &mut summary)?;

        // Step 5: Write
        summary.records_harvested = self.writer.write(&dataset)?;
        summary.processing_time = start_time.elapsed();
        info!(
            "Harvest complete: {} records written to {}",
            summary.records_harvested,
            summary.output_path.display()
        );

        print_summary(&summary);
        Ok(summary)
    }

    fn clean(&self, dataset: &mut Dataset, summary: &mut HarvestSummary) -> Result<()> {
        trim_strings(dataset);

        summary.unparsed_timestamps = parse_timestamps(dataset);

        if self.config.deduplicate {
            let removed = deduplicate_by_timestamp(dataset, self.config.raw_priority_active());
            summary.duplicates_removed = Some(removed);
        }

        derive_horizontal(dataset);
        let rejected = evaluate_fields(dataset);
        debug!("{} cells left empty by field evaluation", rejected);

        if self.config.profile == FieldProfile::Short {
            strip_short_prefixes(dataset)?;
        }

        Ok(())
    }
}

/// Drop the `Exif.Photo.` / `Exif.Image.` prefix from column names
pub fn strip_short_prefixes(dataset: &mut Dataset) -> Result<()> {
    let pattern = Regex::new(SHORT_NAME_PATTERN)
        .map_err(|e| HarvestError::configuration(format!("invalid column pattern: {}", e)))?;
    dataset.rename_columns(|name| pattern.replace(name, "").into_owned());
    Ok(())
}

fn print_summary(summary: &HarvestSummary) {
    println!("\n{}", "Harvest Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.processing_time.as_millis().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files found:".bright_cyan(),
        summary.files_found.to_string().bright_white()
    );
    let errors = summary.errors.to_string();
    println!(
        "  {} {}",
        "Errors:".bright_cyan(),
        if summary.errors > 0 {
            errors.bright_red().bold()
        } else {
            errors.bright_white()
        }
    );
    println!(
        "  {} {}",
        "Unparsed timestamps:".bright_cyan(),
        summary.unparsed_timestamps.to_string().bright_white()
    );
    if let Some(removed) = summary.duplicates_removed {
        println!(
            "  {} {}",
            "Drop duplicates:".bright_cyan(),
            removed.to_string().bright_white()
        );
    }
    println!(
        "  {} {}",
        "Records written:".bright_cyan(),
        summary.records_harvested.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Report:".bright_cyan(),
        summary.output_path.display()
    );
}
