use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "popmydata",
    version,
    about = "Attractiveness scoring for commercial premises in Paris, Bordeaux and Lille"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding popmydata.toml (defaults to the input file's directory)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a location from pre-counted measurement tables
    Score(ScoreCommand),
    /// Count datasets around a location, then score it
    Survey(SurveyCommand),
    /// List configured city profiles
    Cities,
    /// Find the owner of a premises and show how it would be looked up
    Owner(OwnerCommand),
}

#[derive(Args)]
pub struct ScoreCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Exit with code 1 when the index is unfavorable
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct SurveyCommand {
    pub path: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Exit with code 1 when the index is unfavorable
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct OwnerCommand {
    /// Legal-entity premises file (CSV)
    #[arg(long)]
    pub dataset: PathBuf,
    /// Street name; close spellings are matched
    #[arg(long)]
    pub street: String,
    /// Street number, without repetition index
    #[arg(long)]
    pub number: String,
    /// Owner denomination to pick when several own premises at the address
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
