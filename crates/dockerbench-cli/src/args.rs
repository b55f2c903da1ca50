use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use dockerbench_core::dockerfile::discover::DEFAULT_PATTERN;

#[derive(Debug, Parser)]
#[command(
    name = "dockerbench",
    version,
    about = "Runs CIS Docker Benchmark checks against dockerfiles",
    long_about = "Runs CIS Docker Benchmark checks against dockerfiles. \
                  Rules applied are 4.1, 4.2, 4.3, 4.6, 4.7, 4.9 and 4.10; \
                  4.2, 4.3 and 4.10 only run when their list is given."
)]
pub struct Args {
    /// Log level or filter directive (overridden by DOCKERBENCH_LOG)
    #[arg(long, default_value = "info")]
    pub level: String,

    /// Trusted base images, separated by commas
    #[arg(short = 'b', long, default_value = "")]
    pub trusted_base_images: String,

    /// Disallowed packages, separated by commas
    #[arg(short = 'p', long, default_value = "")]
    pub disallowed_packages: String,

    /// Secret patterns (regular expressions), separated by commas
    #[arg(short = 's', long, default_value = "")]
    pub secret_patterns: String,

    /// Directory to search for dockerfiles
    #[arg(short = 'd', long, default_value = "./")]
    pub directory: PathBuf,

    /// Dockerfile name pattern
    #[arg(short = 'f', long, default_value = DEFAULT_PATTERN)]
    pub dockerfile_pattern: String,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Exit with status 1 when any rule reports a violation
    #[arg(long)]
    pub fail_on_violation: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Split a comma-separated list, trimming items and dropping empty ones.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
