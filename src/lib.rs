//! EXIF Harvest Library
//!
//! Walks a directory tree of images, reads the EXIF metadata of every
//! supported file, and writes one delimited report row per image.
//!
//! This library provides tools for:
//! - Recursive discovery of image files by extension
//! - EXIF extraction into tag maps, with a full or a short field profile
//! - Cleaning passes: string trimming, capture-timestamp parsing, evaluation
//!   of rational fields and an orientation flag
//! - Deduplication of captures sharing a timestamp, optionally preferring RAW
//! - Writing the report as CSV/TSV through polars

pub mod cleaning;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod models;
pub mod processor;
pub mod reader;

// Re-export commonly used types
pub use config::HarvestConfig;
pub use dataset::Dataset;
pub use error::{HarvestError, Result};
pub use models::{Cell, FieldProfile, HarvestSummary, Record, TagMap};
pub use processor::HarvestProcessor;
pub use reader::{ExifReader, MetadataReader};
