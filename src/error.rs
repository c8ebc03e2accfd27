//! Error handling for harvest operations.
//!
//! Distinguishes run-aborting failures (bad walk directory, output collision,
//! empty result) from per-file and per-row failures that the pipeline recovers
//! from locally.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("EXIF decoding error: {0}")]
    Exif(#[from] exif::Error),

    #[error("Walk directory does not exist or is not a directory: {path}")]
    InvalidPath { path: PathBuf },

    #[error("No images to harvest in: {path}")]
    NoCandidates { path: PathBuf },

    #[error("Report file exists: {path}. Delete it first, or use -w to allow overwriting")]
    OutputExists { path: PathBuf },

    #[error("Extraction failed for file: {path} - {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("Unparsable timestamp '{value}': {source}")]
    Parse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Empty dataset: no records survived extraction")]
    EmptyDataset,

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl HarvestError {
    /// Aborts that end the run with exit status 0 and no output written.
    ///
    /// `InvalidPath` is not among them: a missing or non-directory walk
    /// directory is reported as a failure and exits with status 1.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            HarvestError::NoCandidates { .. }
                | HarvestError::OutputExists { .. }
                | HarvestError::EmptyDataset
        )
    }

    pub fn extraction(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
