//! CLI command definitions and dispatch.

pub mod output;
pub mod release;
pub mod request;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shipit_core::result::AppResult;
use shipit_release::Shipit;

use self::output::OutputFormat;

/// shipit: label-driven semantic version bumps, release notes, and releases
#[derive(Debug, Parser)]
#[command(name = "shipit", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to $SHIPIT_CONFIG, then .shipit)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Repository working tree
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Report what would happen without changing anything
    #[arg(short, long, global = true)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the bump the unreleased commits warrant
    Version,
    /// Print the version the next release would get
    NextVersion,
    /// Generate release notes and commit them to the changelog
    Changelog(release::RangeArgs),
    /// Create the hosting release for the unreleased commits
    Release(release::RangeArgs),
    /// Version, publish, and release; canary on other branches
    Shipit(release::RangeArgs),
    /// Publish a canary build
    Canary(release::CanaryArgs),
    /// Create, update, or delete a tracked comment
    Comment(request::CommentArgs),
    /// Add a label to a request
    Label(request::LabelArgs),
    /// Print the labels on a request
    Labels(request::RequestArgs),
    /// Report whether a request carries a release label
    PrCheck(request::RequestArgs),
}

impl Commands {
    /// Whether a live run of this command writes to the hosting platform.
    pub fn writes_to_platform(&self) -> bool {
        matches!(
            self,
            Self::Release(_)
                | Self::Shipit(_)
                | Self::Canary(_)
                | Self::Comment(_)
                | Self::Label(_)
                | Self::PrCheck(_)
        )
    }
}

impl Cli {
    /// Execute the command and return what to print.
    pub async fn execute(&self, shipit: &Shipit) -> AppResult<String> {
        match &self.command {
            Commands::Version => release::version(shipit, self.format).await,
            Commands::NextVersion => release::next_version(shipit, self.format).await,
            Commands::Changelog(args) => {
                release::changelog(shipit, args, self.dry_run, self.format).await
            }
            Commands::Release(args) => {
                release::release(shipit, args, self.dry_run, self.format).await
            }
            Commands::Shipit(args) => release::ship(shipit, args, self.dry_run, self.format).await,
            Commands::Canary(args) => {
                release::canary(shipit, args, self.dry_run, self.format).await
            }
            Commands::Comment(args) => request::comment(shipit, args, self.dry_run).await,
            Commands::Label(args) => {
                request::label(shipit, args, self.dry_run, self.format).await
            }
            Commands::Labels(args) => request::labels(shipit, args, self.format).await,
            Commands::PrCheck(args) => {
                request::pr_check(shipit, args, self.dry_run, self.format).await
            }
        }
    }
}
