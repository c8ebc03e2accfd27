//! Core data structures and types for harvesting.
//!
//! Defines tag maps returned by readers, cell values, assembled records,
//! the field profile, and run summary statistics.

use crate::constants::{REPORT_TIMESTAMP_FORMAT, SHORT_FIELDS};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Tag name to raw value mapping, in the order the reader produced them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMap {
    entries: Vec<(String, String)>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, replacing the value of an existing tag in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TagMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// One value in the dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Number(f64),
    Timestamp(NaiveDateTime),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Cell::Integer(_) | Cell::Number(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Number(n) => write!(f, "{:?}", n),
            Cell::Timestamp(ts) => write!(f, "{}", ts.format(REPORT_TIMESTAMP_FORMAT)),
        }
    }
}

/// Which tags make it into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldProfile {
    /// Every tag the reader returns
    #[default]
    Full,
    /// The fixed twelve-field allow-list
    Short,
}

impl FieldProfile {
    /// Fixed field list, if this profile has one
    pub fn fields(&self) -> Option<&'static [&'static str]> {
        match self {
            FieldProfile::Full => None,
            FieldProfile::Short => Some(&SHORT_FIELDS),
        }
    }
}

/// One harvested file: derived fields first, then tag fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Cell)>,
}

impl Record {
    pub fn new(fields: Vec<(String, Cell)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, Cell)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn into_fields(self) -> Vec<(String, Cell)> {
        self.fields
    }
}

/// Counters gathered while extracting records
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionStats {
    pub files_read: usize,
    pub records_kept: usize,
    pub errors: usize,
}

/// Final statistics for one harvest run
#[derive(Debug, Default)]
pub struct HarvestSummary {
    pub files_found: usize,
    pub records_harvested: usize,
    pub errors: usize,
    pub unparsed_timestamps: usize,
    /// Set only when deduplication ran
    pub duplicates_removed: Option<usize>,
    pub output_path: PathBuf,
    pub processing_time: Duration,
}
