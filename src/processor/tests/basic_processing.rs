//! Basic processing scenario tests

use super::{StaticReader, create_photo_tree, read_report, report_column};
use crate::config::HarvestConfig;
use crate::constants::tags;
use crate::models::FieldProfile;
use crate::processor::HarvestProcessor;
use std::sync::Arc;
use tempfile::TempDir;

/// RAW+JPEG pair from one shutter release plus an unrelated, rotated JPEG
fn pair_reader() -> StaticReader {
    StaticReader::new()
        .with_file(
            "a.CR2",
            [
                (tags::DATE_TIME_ORIGINAL, "2022:01:01 12:00:00"),
                (tags::EXPOSURE_TIME, "1/125"),
                (tags::F_NUMBER, "28/10"),
                (tags::ORIENTATION, "1"),
                (tags::MAKE, "Canon"),
            ],
        )
        .with_file(
            "a.JPG",
            [
                (tags::DATE_TIME_ORIGINAL, "2022:01:01 12:00:00"),
                (tags::EXPOSURE_TIME, "1/125"),
                (tags::F_NUMBER, "28/10"),
                (tags::ORIENTATION, "1"),
                (tags::MAKE, "Canon"),
            ],
        )
        .with_file(
            "b.jpg",
            [
                (tags::DATE_TIME_ORIGINAL, "2022:01:01 12:00:05"),
                (tags::EXPOSURE_TIME, "1/60"),
                (tags::F_NUMBER, "4"),
                (tags::ORIENTATION, "6"),
                (tags::MAKE, "Canon "),
            ],
        )
}

fn quiet_config() -> HarvestConfig {
    HarvestConfig::default().without_progress()
}

#[tokio::test]
async fn test_dedup_with_raw_priority_keeps_raw() {
    let temp_dir = TempDir::new().unwrap();
    let walk_dir = create_photo_tree(temp_dir.path(), &["a.CR2", "a.JPG"]);
    let output = temp_dir.path().join("report.csv");

    let config = quiet_config().with_deduplication().with_raw_priority();
    let processor = HarvestProcessor::new(&walk_dir, output.clone(), config)
        .unwrap()
        .with_reader(Arc::new(pair_reader()));

    let summary = processor.process().await.unwrap();

    assert_eq!(summary.files_found, 2);
    assert_eq!(summary.records_harvested, 1);
    assert_eq!(summary.duplicates_removed, Some(1));
    assert_eq!(summary.errors, 0);

    let report = read_report(&output);
    assert_eq!(report.len(), 2);
    assert_eq!(report_column(&report, "Filename"), vec!["a.CR2"]);
    assert_eq!(report_column(&report, "Filetype"), vec!["cr2"]);
    assert_eq!(
        report_column(&report, tags::DATE_TIME_ORIGINAL),
        vec!["2022-01-01 12:00:00"]
    );
}

#[tokio::test]
async fn test_without_deduplication_keeps_every_file() {
    let temp_dir = TempDir::new().unwrap();
    let walk_dir = create_photo_tree(temp_dir.path(), &["a.CR2", "a.JPG", "b.jpg"]);
    let output = temp_dir.path().join("report.csv");

    let processor = HarvestProcessor::new(&walk_dir, output.clone(), quiet_config())
        .unwrap()
        .with_reader(Arc::new(pair_reader()));

    let summary = processor.process().await.unwrap();

    assert_eq!(summary.records_harvested, 3);
    assert_eq!(summary.duplicates_removed, None);
    assert_eq!(read_report(&output).len(), 4);
}

#[tokio::test]
async fn test_full_profile_columns_and_values() {
    let temp_dir = TempDir::new().unwrap();
    let walk_dir = create_photo_tree(temp_dir.path(), &["b.jpg"]);
    let output = temp_dir.path().join("report.csv");

    let processor = HarvestProcessor::new(&walk_dir, output.clone(), quiet_config())
        .unwrap()
        .with_reader(Arc::new(pair_reader()));
    processor.process().await.unwrap();

    let report = read_report(&output);
    assert_eq!(
        report[0],
        vec![
            "Folder",
            "Filename",
            "Filetype",
            tags::DATE_TIME_ORIGINAL,
            tags::EXPOSURE_TIME,
            tags::F_NUMBER,
            tags::ORIENTATION,
            tags::MAKE,
            "Horizontal",
            "ExposureTimeN",
        ]
    );

    // Raw exposure time is kept next to its evaluated companion
    assert_eq!(report_column(&report, tags::EXPOSURE_TIME), vec!["1/60"]);
    assert_eq!(report_column(&report, tags::F_NUMBER), vec!["4"]);
    assert_eq!(report_column(&report, "Horizontal"), vec!["0"]);
    assert_eq!(report_column(&report, tags::MAKE), vec!["Canon"]);
    assert_eq!(
        report_column(&report, "Folder"),
        vec![walk_dir.to_string_lossy().to_string()]
    );
}

#[tokio::test]
async fn test_short_profile_strips_prefixes() {
    let temp_dir = TempDir::new().unwrap();
    let walk_dir = create_photo_tree(temp_dir.path(), &["a.CR2"]);
    let output = temp_dir.path().join("short.tsv");

    let config = quiet_config().with_profile(FieldProfile::Short);
    let processor = HarvestProcessor::new(&walk_dir, output.clone(), config)
        .unwrap()
        .with_reader(Arc::new(pair_reader()));
    processor.process().await.unwrap();

    let report = read_report(&output);
    let header = &report[0];

    assert_eq!(header.len(), 3 + 12 + 3);
    assert!(header.iter().all(|name| !name.starts_with("Exif.")));
    assert_eq!(&header[3], "DateTimeOriginal");
    assert_eq!(
        &header[header.len() - 3..],
        ["Horizontal", "ExposureTimeN", "ExposureBiasValueN"]
    );

    assert_eq!(report_column(&report, "FNumber"), vec!["2.8"]);
    assert_eq!(report_column(&report, "Horizontal"), vec!["1"]);
    assert_eq!(report_column(&report, "Flash"), vec![""]);
    assert_eq!(report_column(&report, "Make"), vec!["Canon"]);
}

#[tokio::test]
async fn test_unparsable_timestamps_are_counted_and_blank() {
    let temp_dir = TempDir::new().unwrap();
    let walk_dir = create_photo_tree(temp_dir.path(), &["x.jpg", "y.jpg"]);
    let output = temp_dir.path().join("report.csv");

    let reader = StaticReader::new()
        .with_file("x.jpg", [(tags::DATE_TIME_ORIGINAL, "0000:00:00 00:00:00")])
        .with_file("y.jpg", [(tags::DATE_TIME_ORIGINAL, "0000:00:00 00:00:00")]);

    let config = quiet_config().with_deduplication();
    let processor = HarvestProcessor::new(&walk_dir, output.clone(), config)
        .unwrap()
        .with_reader(Arc::new(reader));

    let summary = processor.process().await.unwrap();

    // Null timestamps never collapse into one another
    assert_eq!(summary.unparsed_timestamps, 2);
    assert_eq!(summary.duplicates_removed, Some(0));
    assert_eq!(summary.records_harvested, 2);

    let report = read_report(&output);
    assert_eq!(
        report_column(&report, tags::DATE_TIME_ORIGINAL),
        vec!["", ""]
    );
}
