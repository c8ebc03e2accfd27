//! Application constants for exifharvest
//!
//! Supported file formats, the short field profile, tag names the cleaning
//! stages depend on, and default values.

// =============================================================================
// File Formats
// =============================================================================

/// Extensions (lower-case, no dot) of files the harvester will read
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpeg", "jpg", "exv", "cr2", "crw", "mrw", "tiff", "tif", "webp", "dng", "nef", "pef", "arw",
    "rw2", "sr2", "srw", "orf", "png", "pgf", "raf", "eps", "xmp", "gif", "psd", "tga", "bmp",
    "jp2",
];

/// Extensions of RAW sensor-data containers, preferred when deduplicating
pub const RAW_EXTENSIONS: &[&str] = &[
    "cr2", "crw", "mrw", "dng", "nef", "pef", "arw", "rw2", "sr2", "srw", "orf", "raf",
];

/// Report extensions accepted as-is; anything else gets `.csv` appended
pub const REPORT_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Appended to report paths without a recognized extension
pub const DEFAULT_REPORT_EXTENSION: &str = "csv";

// =============================================================================
// Tag Names
// =============================================================================

pub mod tags {
    pub const DATE_TIME_ORIGINAL: &str = "Exif.Photo.DateTimeOriginal";
    pub const FOCAL_LENGTH: &str = "Exif.Photo.FocalLength";
    pub const EXPOSURE_TIME: &str = "Exif.Photo.ExposureTime";
    pub const F_NUMBER: &str = "Exif.Photo.FNumber";
    pub const ISO_SPEED_RATINGS: &str = "Exif.Photo.ISOSpeedRatings";
    pub const EXPOSURE_BIAS_VALUE: &str = "Exif.Photo.ExposureBiasValue";
    pub const METERING_MODE: &str = "Exif.Photo.MeteringMode";
    pub const FLASH: &str = "Exif.Photo.Flash";
    pub const EXPOSURE_PROGRAM: &str = "Exif.Photo.ExposureProgram";
    pub const ORIENTATION: &str = "Exif.Image.Orientation";
    pub const MAKE: &str = "Exif.Image.Make";
    pub const MODEL: &str = "Exif.Image.Model";
}

/// The short profile: a fixed, ordered allow-list of commonly used tags
pub const SHORT_FIELDS: [&str; 12] = [
    tags::DATE_TIME_ORIGINAL,
    tags::FOCAL_LENGTH,
    tags::EXPOSURE_TIME,
    tags::F_NUMBER,
    tags::ISO_SPEED_RATINGS,
    tags::EXPOSURE_BIAS_VALUE,
    tags::METERING_MODE,
    tags::FLASH,
    tags::EXPOSURE_PROGRAM,
    tags::ORIENTATION,
    tags::MAKE,
    tags::MODEL,
];

/// Prefix stripped from column names when the short profile is active
pub const SHORT_NAME_PATTERN: &str = r"^Exif\.(Photo|Image)\.";

// =============================================================================
// Derived Columns
// =============================================================================

pub mod columns {
    pub const FOLDER: &str = "Folder";
    pub const FILENAME: &str = "Filename";
    pub const FILETYPE: &str = "Filetype";
    pub const HORIZONTAL: &str = "Horizontal";
    pub const EXPOSURE_TIME_N: &str = "ExposureTimeN";
    pub const EXPOSURE_BIAS_VALUE_N: &str = "ExposureBiasValueN";
}

/// Quasi-numeric fields and the column their evaluated value lands in.
/// `None` means the field is rewritten in place.
pub const EVALUATED_FIELDS: &[(&str, Option<&str>)] = &[
    (tags::FOCAL_LENGTH, None),
    (tags::EXPOSURE_TIME, Some(columns::EXPOSURE_TIME_N)),
    (tags::F_NUMBER, None),
    (tags::EXPOSURE_BIAS_VALUE, Some(columns::EXPOSURE_BIAS_VALUE_N)),
    (tags::ISO_SPEED_RATINGS, None),
    (tags::METERING_MODE, None),
    (tags::FLASH, None),
    (tags::EXPOSURE_PROGRAM, None),
];

/// Orientation codes for an image that is not rotated by 90 degrees
pub const HORIZONTAL_ORIENTATIONS: &[&str] = &["1", "2", "3", "4"];

// =============================================================================
// Formats and Defaults
// =============================================================================

/// EXIF capture timestamp layout
pub const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Layout used when writing timestamps to the report
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default report field delimiter
pub const DEFAULT_DELIMITER: u8 = b'\t';
