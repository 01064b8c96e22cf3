use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "leafdiff",
    about = "leafdiff: changed leaf paths between two JSON documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with differ settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the fields that changed from OLD to CURRENT
    Diff(DiffArgs),
    /// Check whether two documents are structurally equal
    Equal(EqualArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub current: PathBuf,
    /// Abort when documents nest deeper than this
    #[arg(long)]
    pub max_depth: Option<usize>,
}

#[derive(Args)]
pub struct EqualArgs {
    pub left: PathBuf,
    pub right: PathBuf,
}
