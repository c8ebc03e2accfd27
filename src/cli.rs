//! Command-line interface components.

use crate::config::HarvestConfig;
use crate::constants::{DEFAULT_REPORT_EXTENSION, REPORT_EXTENSIONS};
use crate::error::{HarvestError, Result};
use crate::models::FieldProfile;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Short flag letters the parser understands
const KNOWN_SHORT_FLAGS: &[char] = &['d', 'r', 's', 'w', 'v', 'h', 'V'];

#[derive(Parser, Debug)]
#[command(name = "exifharvest")]
#[command(about = "Harvest EXIF metadata from an image tree into a delimited report")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Drop files sharing a capture timestamp, keeping one per timestamp
    #[arg(short = 'd', long)]
    pub deduplicate: bool,

    /// Prefer RAW files when deduplicating (requires -d)
    #[arg(short = 'r', long)]
    pub raw: bool,

    /// Harvest only the short list of common fields
    #[arg(short = 's', long)]
    pub short: bool,

    /// Overwrite an existing report
    #[arg(short = 'w', long)]
    pub overwrite: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Report field delimiter: "tab" or a single ASCII character
    #[arg(long, default_value = "tab")]
    pub delimiter: String,

    /// Do not draw a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Walk directory, or the report file when it is not an existing directory
    #[arg(value_name = "WALKDIR")]
    pub first: Option<PathBuf>,

    /// Report file
    #[arg(value_name = "REPORTFILE")]
    pub second: Option<PathBuf>,
}

impl Args {
    /// Resolve the walk directory and the report path against `cwd`
    pub fn resolve_paths(&self, cwd: &Path) -> Result<(PathBuf, PathBuf)> {
        let (walk_dir, report) = match (&self.first, &self.second) {
            (None, _) => (cwd.to_path_buf(), None),
            (Some(first), None) => {
                let first = cwd.join(first);
                if first.is_dir() {
                    (first, None)
                } else {
                    (cwd.to_path_buf(), Some(first))
                }
            }
            (Some(first), Some(second)) => {
                let first = cwd.join(first);
                if !first.is_dir() {
                    return Err(HarvestError::InvalidPath { path: first });
                }
                (first, Some(cwd.join(second)))
            }
        };

        let report = match report {
            Some(path) => with_report_extension(path),
            None => cwd.join(default_report_name(&walk_dir)),
        };

        Ok((walk_dir, report))
    }

    /// Map the parsed flags onto a run configuration
    pub fn to_config(&self) -> Result<HarvestConfig> {
        let mut config = HarvestConfig::default().with_delimiter(parse_delimiter(&self.delimiter)?);

        if self.deduplicate {
            config = config.with_deduplication();
        }
        if self.raw {
            config = config.with_raw_priority();
        }
        if self.short {
            config = config.with_profile(FieldProfile::Short);
        }
        if self.overwrite {
            config = config.with_overwrite();
        }
        if self.no_progress {
            config = config.without_progress();
        }

        Ok(config)
    }
}

/// Strip unknown short flag letters before clap sees the arguments
///
/// Clustered flags such as `-drs` are kept with unknown letters removed, a
/// lone `-` is dropped, and everything after `--` passes through untouched.
/// Returns the cleaned arguments and the rejected letters.
pub fn sanitize_args<I, S>(args: I) -> (Vec<String>, Vec<char>)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut cleaned: Vec<String> = args.next().into_iter().collect();
    let mut unknown = Vec::new();
    let mut verbatim = false;
    let mut takes_value = false;

    for arg in args {
        if verbatim || takes_value {
            takes_value = false;
            cleaned.push(arg);
            continue;
        }

        if arg == "--" {
            verbatim = true;
            cleaned.push(arg);
        } else if arg.starts_with("--") {
            takes_value = arg == "--delimiter";
            cleaned.push(arg);
        } else if arg == "-" {
            continue;
        } else if let Some(letters) = arg.strip_prefix('-') {
            let (known, rejected): (String, String) =
                letters.chars().partition(|c| KNOWN_SHORT_FLAGS.contains(c));
            unknown.extend(rejected.chars());
            if !known.is_empty() {
                cleaned.push(format!("-{}", known));
            }
        } else {
            cleaned.push(arg);
        }
    }

    (cleaned, unknown)
}

/// Append `.csv` unless the path already has a report extension
pub fn with_report_extension(path: PathBuf) -> PathBuf {
    let recognized = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| REPORT_EXTENSIONS.contains(&ext.as_str()));

    if recognized {
        return path;
    }

    let mut name = path.into_os_string();
    name.push(".");
    name.push(DEFAULT_REPORT_EXTENSION);
    PathBuf::from(name)
}

fn default_report_name(walk_dir: &Path) -> String {
    let base = walk_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "exifharvest".to_string());
    format!("{}.{}", base, DEFAULT_REPORT_EXTENSION)
}

/// Parse the `--delimiter` value
pub fn parse_delimiter(value: &str) -> Result<u8> {
    if value.eq_ignore_ascii_case("tab") || value == "\\t" {
        return Ok(b'\t');
    }

    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(HarvestError::configuration(format!(
            "delimiter must be \"tab\" or a single ASCII character, got {:?}",
            value
        ))),
    }
}

/// Set up structured logging to stderr
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("exifharvest={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> (Args, Vec<char>) {
        let (cleaned, unknown) = sanitize_args(args.iter().copied());
        (Args::parse_from(cleaned), unknown)
    }

    #[test]
    fn test_clustered_flags() {
        let (args, unknown) = parse(&["exifharvest", "-drs", "photos"]);

        assert!(args.deduplicate);
        assert!(args.raw);
        assert!(args.short);
        assert!(!args.overwrite);
        assert!(unknown.is_empty());
        assert_eq!(args.first, Some(PathBuf::from("photos")));
    }

    #[test]
    fn test_unknown_letters_dropped() {
        let (args, unknown) = parse(&["exifharvest", "-dxq", "-z", "-", "photos", "out"]);

        assert!(args.deduplicate);
        assert_eq!(unknown, vec!['x', 'q', 'z']);
        assert_eq!(args.first, Some(PathBuf::from("photos")));
        assert_eq!(args.second, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_sanitize_keeps_long_options_and_values() {
        let (cleaned, unknown) = sanitize_args([
            "exifharvest",
            "--delimiter",
            "-",
            "--no-progress",
            "--",
            "-weird-dir",
        ]);

        assert_eq!(
            cleaned,
            vec![
                "exifharvest",
                "--delimiter",
                "-",
                "--no-progress",
                "--",
                "-weird-dir"
            ]
        );
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_report_extension_rules() {
        assert_eq!(
            with_report_extension(PathBuf::from("out.csv")),
            PathBuf::from("out.csv")
        );
        assert_eq!(
            with_report_extension(PathBuf::from("out.TSV")),
            PathBuf::from("out.TSV")
        );
        assert_eq!(
            with_report_extension(PathBuf::from("out.txt")),
            PathBuf::from("out.txt")
        );
        assert_eq!(
            with_report_extension(PathBuf::from("out")),
            PathBuf::from("out.csv")
        );
        assert_eq!(
            with_report_extension(PathBuf::from("out.xlsx")),
            PathBuf::from("out.xlsx.csv")
        );
    }

    #[test]
    fn test_resolve_defaults_to_cwd() {
        let temp_dir = TempDir::new().unwrap();
        let cwd = temp_dir.path().join("holiday");
        fs::create_dir_all(&cwd).unwrap();

        let (args, _) = parse(&["exifharvest"]);
        let (walk_dir, report) = args.resolve_paths(&cwd).unwrap();

        assert_eq!(walk_dir, cwd);
        assert_eq!(report, cwd.join("holiday.csv"));
    }

    #[test]
    fn test_resolve_single_positional() {
        let temp_dir = TempDir::new().unwrap();
        let cwd = temp_dir.path();
        fs::create_dir_all(cwd.join("photos")).unwrap();

        let (args, _) = parse(&["exifharvest", "photos"]);
        let (walk_dir, report) = args.resolve_paths(cwd).unwrap();
        assert_eq!(walk_dir, cwd.join("photos"));
        assert_eq!(report, cwd.join("photos.csv"));

        let (args, _) = parse(&["exifharvest", "summary"]);
        let (walk_dir, report) = args.resolve_paths(cwd).unwrap();
        assert_eq!(walk_dir, cwd);
        assert_eq!(report, cwd.join("summary.csv"));
    }

    #[test]
    fn test_resolve_two_positionals() {
        let temp_dir = TempDir::new().unwrap();
        let cwd = temp_dir.path();
        fs::create_dir_all(cwd.join("photos")).unwrap();

        let (args, _) = parse(&["exifharvest", "photos", "reports/run.tsv"]);
        let (walk_dir, report) = args.resolve_paths(cwd).unwrap();
        assert_eq!(walk_dir, cwd.join("photos"));
        assert_eq!(report, cwd.join("reports/run.tsv"));

        let (args, _) = parse(&["exifharvest", "missing", "run.csv"]);
        assert!(matches!(
            args.resolve_paths(cwd),
            Err(HarvestError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_to_config() {
        let (args, _) = parse(&[
            "exifharvest",
            "-dw",
            "--short",
            "--delimiter",
            ",",
            "--no-progress",
        ]);
        let config = args.to_config().unwrap();

        assert!(config.deduplicate);
        assert!(!config.raw_priority);
        assert!(config.overwrite);
        assert_eq!(config.profile, FieldProfile::Short);
        assert_eq!(config.delimiter, b',');
        assert!(!config.show_progress);
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("TAB").unwrap(), b'\t');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("").is_err());
    }
}
