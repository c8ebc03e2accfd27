//! Metadata reader boundary and the EXIF-backed implementation.
//!
//! A reader turns one file into a namespaced tag map. Decoding the container
//! is delegated to `kamadak-exif`; this module only names and renders the
//! fields.

use crate::error::Result;
use crate::models::TagMap;
use exif::{Context, Field, In, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Source of per-file tag maps
pub trait MetadataReader: Send + Sync {
    /// Read every tag of one file. An unreadable file is an error; a file
    /// without tags may return an empty map.
    fn read(&self, path: &Path) -> Result<TagMap>;
}

/// Reads EXIF data from JPEG, TIFF-based RAW, PNG, WebP and HEIF containers
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifReader;

impl ExifReader {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataReader for ExifReader {
    fn read(&self, path: &Path) -> Result<TagMap> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let exif = exif::Reader::new().read_from_container(&mut reader)?;

        let tags: TagMap = exif
            .fields()
            .filter(|field| field.ifd_num == In::PRIMARY)
            .filter_map(|field| render_value(&field.value).map(|v| (tag_name(field), v)))
            .collect();

        debug!("Read {} tags from {}", tags.len(), path.display());
        Ok(tags)
    }
}

/// Tags whose Exif 2.3 name differs from the exiv2-style name used in reports
const RENAMED_TAGS: &[(&str, &str)] = &[("PhotographicSensitivity", "ISOSpeedRatings")];

/// Report name for a known tag
fn report_tag_name(name: &str) -> &str {
    RENAMED_TAGS
        .iter()
        .find(|(decoded, _)| *decoded == name)
        .map_or(name, |&(_, renamed)| renamed)
}

/// Namespaced name, e.g. `Exif.Photo.FNumber`
fn tag_name(field: &Field) -> String {
    #[allow(unreachable_patterns)]
    let group = match field.tag.context() {
        Context::Tiff => "Image",
        Context::Exif => "Photo",
        Context::Gps => "GPSInfo",
        Context::Interop => "Iop",
        _ => "Unknown",
    };

    match field.tag.description() {
        Some(_) => format!(
            "Exif.{}.{}",
            group,
            report_tag_name(&field.tag.to_string())
        ),
        None => format!("Exif.{}.0x{:04x}", group, field.tag.number()),
    }
}

/// Raw textual form of a value: rationals stay `num/den` for the evaluator
fn render_value(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string())
            .collect::<Vec<_>>()
            .join(" "),
        Value::Byte(v) => join(v),
        Value::Short(v) => join(v),
        Value::Long(v) => join(v),
        Value::SByte(v) => join(v),
        Value::SShort(v) => join(v),
        Value::SLong(v) => join(v),
        Value::Float(v) => join(v),
        Value::Double(v) => join(v),
        Value::Undefined(bytes, _) => join(bytes),
        Value::Rational(v) => v
            .iter()
            .map(|r| format!("{}/{}", r.num, r.denom))
            .collect::<Vec<_>>()
            .join(" "),
        Value::SRational(v) => v
            .iter()
            .map(|r| format!("{}/{}", r.num, r.denom))
            .collect::<Vec<_>>()
            .join(" "),
        _ => return None,
    };
    Some(rendered)
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::tags;
    use crate::error::HarvestError;
    use exif::{Rational, SRational, Tag};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_rational() {
        let value = Value::Rational(vec![Rational { num: 1, denom: 125 }]);
        assert_eq!(render_value(&value).unwrap(), "1/125");

        let bias = Value::SRational(vec![SRational { num: -2, denom: 3 }]);
        assert_eq!(render_value(&bias).unwrap(), "-2/3");
    }

    #[test]
    fn test_render_ascii_strips_nul() {
        let value = Value::Ascii(vec![b"2022:01:01 12:00:00\0".to_vec()]);
        assert_eq!(render_value(&value).unwrap(), "2022:01:01 12:00:00");
    }

    #[test]
    fn test_render_integer_arrays() {
        assert_eq!(render_value(&Value::Short(vec![1])).unwrap(), "1");
        assert_eq!(render_value(&Value::Short(vec![24, 70])).unwrap(), "24 70");
        assert_eq!(
            render_value(&Value::Undefined(vec![48, 50, 51, 48], 0)).unwrap(),
            "48 50 51 48"
        );
    }

    #[test]
    fn test_iso_uses_exiv2_name() {
        let field = Field {
            tag: Tag::PhotographicSensitivity,
            ifd_num: In::PRIMARY,
            value: Value::Short(vec![400]),
        };
        assert_eq!(tag_name(&field), tags::ISO_SPEED_RATINGS);
        assert_eq!(report_tag_name("FNumber"), "FNumber");
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = ExifReader::new().read(&temp_dir.path().join("absent.jpg"));
        assert!(matches!(result, Err(HarvestError::Io(_))));
    }

    #[test]
    fn test_non_image_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fake.jpg");
        fs::write(&path, "not really a jpeg").unwrap();

        let result = ExifReader::new().read(&path);
        assert!(result.is_err());
    }
}
