use clap::Parser;
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Scan a component portfolio and report newly identified vulnerabilities
#[derive(Parser, Debug)]
#[command(name = "portfolio-analyzer")]
#[command(version)]
#[command(
    about = "Scan a component portfolio and report newly identified vulnerabilities",
    long_about = None
)]
pub struct Args {
    /// Portfolio snapshot (JSON: projects, components, dependencies, associations)
    #[arg(short, long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Advisory feed the analyzers match components against (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub advisories: Option<PathBuf>,

    /// Configuration file (defaults to ./portfolio-analyzer.config.yml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run only the named analyzer; can be specified multiple times
    #[arg(long = "analyzer", value_name = "NAME")]
    pub analyzers: Vec<String>,

    /// Components fetched per page (overrides the config file)
    #[arg(long, value_name = "N", value_parser = parse_page_size)]
    pub page_size: Option<usize>,

    /// Stop a scan at the first failed batch
    #[arg(long)]
    pub fail_fast: bool,

    /// Log format: pretty or json
    #[arg(long, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,

    /// Write notifications to this file instead of stdout (JSON lines)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Write the associations recorded during the run back into the snapshot
    /// file, so the next run does not report them again
    #[arg(long)]
    pub update_snapshot: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

fn parse_page_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a positive integer", value))?;
    if size == 0 {
        return Err("page size must be greater than 0".to_string());
    }
    Ok(size)
}
