//! Report writing module
//!
//! Materializes the dataset as a polars DataFrame and writes it as delimited
//! text: a header row, one row per record, empty fields for missing values.

use crate::config::HarvestConfig;
use crate::constants::REPORT_TIMESTAMP_FORMAT;
use crate::dataset::Dataset;
use crate::error::{HarvestError, Result};

use polars::prelude::{CsvWriter, SerWriter};
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Delimited-text writer for the harvest report
#[derive(Debug)]
pub struct ReportWriter {
    output_path: PathBuf,
    delimiter: u8,
    overwrite: bool,
}

impl ReportWriter {
    pub fn new(output_path: PathBuf, config: &HarvestConfig) -> Self {
        Self {
            output_path,
            delimiter: config.delimiter,
            overwrite: config.overwrite,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Fail early if the report exists and may not be replaced
    pub fn check_destination(&self) -> Result<()> {
        if self.output_path.exists() && !self.overwrite {
            return Err(HarvestError::OutputExists {
                path: self.output_path.clone(),
            });
        }
        Ok(())
    }

    /// Write the dataset, returning the number of data rows written
    pub fn write(&self, dataset: &Dataset) -> Result<usize> {
        self.check_destination()?;

        let mut df = dataset.to_frame()?;

        if let Some(parent) = self.output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = self.open_output()?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(self.delimiter)
            .with_datetime_format(Some(REPORT_TIMESTAMP_FORMAT.to_string()))
            .finish(&mut df)?;

        debug!(
            "Wrote {} rows x {} columns to {}",
            df.height(),
            df.width(),
            self.output_path.display()
        );
        Ok(df.height())
    }

    fn open_output(&self) -> Result<File> {
        if self.overwrite {
            return Ok(File::create(&self.output_path)?);
        }

        // create_new guards against a file appearing after check_destination
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.output_path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => HarvestError::OutputExists {
                    path: self.output_path.clone(),
                },
                _ => HarvestError::Io(e),
            })
    }
}
