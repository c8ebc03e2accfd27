//! Capture-timestamp deduplication
//!
//! Files produced by one shutter release (a RAW+JPEG pair, or a burst
//! recorded within the same second) share a capture timestamp. This module
//! collapses each such group to a single representative row, optionally
//! preferring the RAW capture.

use crate::constants::{RAW_EXTENSIONS, columns, tags};
use crate::dataset::Dataset;
use crate::models::Cell;
use chrono::NaiveDateTime;
use tracing::{debug, info};

/// Collapse rows sharing a capture timestamp to one row each
///
/// Rows with a null timestamp are never touched. Keyed rows are stable-sorted
/// by timestamp (and by RAW flag, non-RAW first, when `raw_priority` is set)
/// and the last row of each timestamp survives. Ties between rows with equal
/// sort keys therefore go to whichever came last in enumeration order.
///
/// # Arguments
///
/// * `dataset` - Dataset with an already parsed timestamp column
/// * `raw_priority` - Prefer RAW files over processed formats
///
/// # Returns
///
/// Number of rows removed
pub fn deduplicate_by_timestamp(dataset: &mut Dataset, raw_priority: bool) -> usize {
    let before = dataset.len();

    let mut survivors = Vec::with_capacity(before);
    let mut keyed: Vec<(NaiveDateTime, u8, usize)> = Vec::new();

    for row in 0..before {
        match dataset.cell(row, tags::DATE_TIME_ORIGINAL) {
            Cell::Timestamp(ts) => {
                let flag = if raw_priority {
                    raw_flag(dataset.cell(row, columns::FILETYPE))
                } else {
                    0
                };
                keyed.push((*ts, flag, row));
            }
            _ => survivors.push(row),
        }
    }

    debug!(
        "Deduplicating {} timestamped rows ({} without timestamp)",
        keyed.len(),
        survivors.len()
    );

    // sort_by_key is stable
    keyed.sort_by_key(|&(ts, flag, _)| (ts, flag));

    let mut duplicate_groups = 0;
    for (i, &(ts, _, row)) in keyed.iter().enumerate() {
        let last_of_group = keyed.get(i + 1).is_none_or(|next| next.0 != ts);
        if last_of_group {
            survivors.push(row);
        } else if i == 0 || keyed[i - 1].0 != ts {
            duplicate_groups += 1;
        }
    }

    dataset.select_rows(&survivors);
    let removed = before - dataset.len();

    info!(
        "Deduplication complete: {} duplicate groups, {} rows removed, {} rows remaining",
        duplicate_groups,
        removed,
        dataset.len()
    );

    removed
}

/// 1 for RAW file types, 0 for everything else including missing values
pub fn raw_flag(filetype: &Cell) -> u8 {
    match filetype {
        Cell::Text(ext) if is_raw_extension(ext) => 1,
        _ => 0,
    }
}

/// Check a lower-case, dot-less extension against the RAW formats
pub fn is_raw_extension(ext: &str) -> bool {
    RAW_EXTENSIONS.contains(&ext)
}
