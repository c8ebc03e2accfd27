//! String normalization

use crate::dataset::Dataset;
use crate::models::Cell;

/// Trim leading and trailing whitespace from every text cell
pub fn trim_strings(dataset: &mut Dataset) {
    dataset.transform_all(|cell| match cell {
        Cell::Text(s) => Cell::Text(s.trim().to_string()),
        other => other.clone(),
    });
}
