//! Capture timestamp parsing
//!
//! Values that do not match the EXIF layout exactly are nulled rather than
//! rejected; the row stays in the dataset.

use crate::constants::{TIMESTAMP_FORMAT, tags};
use crate::dataset::Dataset;
use crate::error::{HarvestError, Result};
use crate::models::Cell;
use chrono::NaiveDateTime;
use tracing::debug;

/// Parse one EXIF timestamp such as `2022:01:01 12:00:00`
pub fn parse_capture_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| HarvestError::Parse {
        value: value.to_string(),
        source,
    })
}

/// Parse the capture timestamp column in place.
///
/// Returns the number of non-null values that failed to parse.
pub fn parse_timestamps(dataset: &mut Dataset) -> usize {
    let mut failures = 0;

    dataset.transform_column(tags::DATE_TIME_ORIGINAL, |cell| match cell {
        Cell::Text(value) => match parse_capture_time(value) {
            Ok(ts) => Cell::Timestamp(ts),
            Err(e) => {
                debug!("{}", e);
                failures += 1;
                Cell::Null
            }
        },
        Cell::Timestamp(ts) => Cell::Timestamp(*ts),
        Cell::Null => Cell::Null,
        other => {
            failures += 1;
            debug!("Non-text capture timestamp {:?} set to null", other);
            Cell::Null
        }
    });

    failures
}
