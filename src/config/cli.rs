use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "scope-estimate")]
#[command(about = "Estimate FCC engagement effort and role allocation from a scoping answer file")]
pub struct CliArgs {
    #[arg(long, short, help = "Path to the engagement TOML file")]
    pub config: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Print the estimate as JSON instead of a summary")]
    pub json: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(long, help = "Parse and validate the engagement file without estimating")]
    pub dry_run: bool,
}
