use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tonality",
    version,
    about = "Video sentiment scoring from comments and captions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score one video from a fixture catalog
    Analyze(AnalyzeArgs),
    /// Check an engine config file without running anything
    Validate(ValidateArgs),
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// JSON fixture catalog: a map of video id to {comments, caption}
    #[arg(long)]
    pub fixtures: PathBuf,

    /// Video id to analyze
    #[arg(long)]
    pub video: String,

    /// Engine config YAML; defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scoring provider: "lexicon" or "fixed:<score>"
    #[arg(long, default_value = "lexicon")]
    pub provider: String,

    /// Append the outcome to this JSONL file when a score is available
    #[arg(long)]
    pub store: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    #[arg(long, default_value = "tonality.yaml")]
    pub config: PathBuf,
}
