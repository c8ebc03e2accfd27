use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use exifharvest::cli::{Args, sanitize_args, setup_logging};
use exifharvest::{HarvestError, HarvestProcessor, HarvestSummary};
use std::process;
use tracing::{debug, warn};

fn main() {
    let (cleaned, unknown) = sanitize_args(std::env::args());
    let args = Args::parse_from(cleaned);

    setup_logging(args.verbose);
    for flag in unknown {
        warn!("Unknown key -{} will be skipped", flag);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(run(args)) {
        Ok(summary) => {
            debug!("Finished in {:?}", summary.processing_time);
            process::exit(0);
        }
        Err(error) => match error.downcast_ref::<HarvestError>() {
            Some(harvest_error) if harvest_error.is_benign() => {
                println!("{}", harvest_error.to_string().bright_yellow());
                process::exit(0);
            }
            _ => {
                eprintln!("Error: {:#}", error);
                process::exit(1);
            }
        },
    }
}

async fn run(args: Args) -> Result<HarvestSummary> {
    let cwd = std::env::current_dir().context("Could not determine the current directory")?;
    let (walk_dir, report) = args.resolve_paths(&cwd)?;
    let config = args.to_config()?;

    debug!("Walk directory: {}", walk_dir.display());
    debug!("Report file: {}", report.display());

    let processor = HarvestProcessor::new(&walk_dir, report, config)?;
    let summary = processor.process().await?;
    Ok(summary)
}
