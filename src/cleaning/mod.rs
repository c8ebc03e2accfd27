//! Column-wide cleaning passes applied after extraction
//!
//! Each pass rewrites a `Dataset` in place, in pipeline order:
//! normalization, timestamp parsing, deduplication, field evaluation.

pub mod deduplication;
pub mod evaluation;
pub mod normalization;
pub mod timestamps;

pub use deduplication::deduplicate_by_timestamp;
pub use evaluation::{derive_horizontal, evaluate_expression, evaluate_fields};
pub use normalization::trim_strings;
pub use timestamps::parse_timestamps;
