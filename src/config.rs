//! Configuration management and validation.
//!
//! Holds every switch a harvest run depends on. Built from CLI flags, or
//! directly in code through the `with_*` builders.

use crate::error::{HarvestError, Result};
use crate::constants::DEFAULT_DELIMITER;
use crate::models::FieldProfile;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Run configuration for the harvester
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Collapse rows sharing a capture timestamp
    pub deduplicate: bool,

    /// Prefer RAW files when collapsing duplicates
    pub raw_priority: bool,

    /// Field set selected for every record
    pub profile: FieldProfile,

    /// Replace an existing report file
    pub overwrite: bool,

    /// Report field delimiter
    pub delimiter: u8,

    /// Maximum metadata reads in flight
    pub max_concurrent_files: usize,

    /// Draw a progress bar during extraction
    pub show_progress: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            deduplicate: false,
            raw_priority: false,
            profile: FieldProfile::Full,
            overwrite: false,
            delimiter: DEFAULT_DELIMITER,
            max_concurrent_files: num_cpus::get().max(1),
            show_progress: true,
        }
    }
}

impl HarvestConfig {
    /// Enable deduplication by capture timestamp
    pub fn with_deduplication(mut self) -> Self {
        self.deduplicate = true;
        self
    }

    /// Prefer RAW captures among duplicates
    pub fn with_raw_priority(mut self) -> Self {
        self.raw_priority = true;
        self
    }

    pub fn with_profile(mut self, profile: FieldProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    /// Disable the progress bar (tests, non-interactive runs)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// RAW priority only has an effect when deduplicating
    pub fn raw_priority_active(&self) -> bool {
        self.deduplicate && self.raw_priority
    }

    /// Check the configuration before any work starts
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(HarvestError::configuration(
                "max_concurrent_files must be at least 1",
            ));
        }

        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(HarvestError::configuration(format!(
                "unsupported delimiter: {:?}",
                self.delimiter as char
            )));
        }

        if self.raw_priority && !self.deduplicate {
            warn!("RAW priority (-r) has no effect without deduplication (-d)");
        }

        Ok(())
    }
}
