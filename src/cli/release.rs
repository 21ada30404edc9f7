//! Release commands: version, next-version, changelog, release, shipit, canary.

use clap::Args;
use serde_json::json;

use shipit_core::result::AppResult;
use shipit_release::{CanaryOptions, CanaryStatus, ShipOptions, Shipit};

use super::output::{OutputFormat, render};

/// Commit range of a release command
#[derive(Debug, Default, Args)]
pub struct RangeArgs {
    /// Start of the range (exclusive); defaults to the latest release
    #[arg(long)]
    pub from: Option<String>,
    /// End of the range (inclusive); defaults to HEAD
    #[arg(long)]
    pub to: Option<String>,
}

impl RangeArgs {
    fn options(&self, dry_run: bool) -> ShipOptions {
        ShipOptions {
            dry_run,
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }
}

/// Arguments for `canary`
#[derive(Debug, Default, Args)]
pub struct CanaryArgs {
    /// Request the canary is built for; defaults to the CI request
    #[arg(long = "pr")]
    pub request_number: Option<u64>,
    /// Build id; defaults to the CI build
    #[arg(long)]
    pub build: Option<String>,
    /// Start of the range (exclusive); defaults to the latest release
    #[arg(long)]
    pub from: Option<String>,
}

/// `version`: the bump name, empty when no release is due.
pub async fn version(shipit: &Shipit, format: OutputFormat) -> AppResult<String> {
    let bump = shipit.version().await?;
    let text = bump.map(|b| b.to_string()).unwrap_or_default();
    render(format, text, &json!({ "bump": bump }))
}

/// `next-version`: the version string, empty when no release is due.
pub async fn next_version(shipit: &Shipit, format: OutputFormat) -> AppResult<String> {
    let version = shipit.next_version().await?;
    let text = version.clone().unwrap_or_default();
    render(format, text, &json!({ "version": version }))
}

/// `changelog`: the generated notes.
pub async fn changelog(
    shipit: &Shipit,
    args: &RangeArgs,
    dry_run: bool,
    format: OutputFormat,
) -> AppResult<String> {
    let notes = shipit.changelog(&args.options(dry_run)).await?;
    let text = notes.clone().unwrap_or_default();
    render(format, text, &json!({ "notes": notes, "dry_run": dry_run }))
}

/// `release`: the created release URL.
pub async fn release(
    shipit: &Shipit,
    args: &RangeArgs,
    dry_run: bool,
    format: OutputFormat,
) -> AppResult<String> {
    let release = shipit.release(&args.options(dry_run)).await?;
    let text = release.as_ref().map(|r| r.url.clone()).unwrap_or_default();
    render(format, text, &json!({ "release": release, "dry_run": dry_run }))
}

/// `shipit`: the released or would-be version.
pub async fn ship(
    shipit: &Shipit,
    args: &RangeArgs,
    dry_run: bool,
    format: OutputFormat,
) -> AppResult<String> {
    let report = shipit.shipit(&args.options(dry_run)).await?;
    let text = match &report.canary {
        Some(canary) => canary_line(&canary.version, &canary.status),
        None => report.version.clone().unwrap_or_default(),
    };
    render(format, text, &report)
}

/// `canary`: the published version, or the publisher's failure message.
pub async fn canary(
    shipit: &Shipit,
    args: &CanaryArgs,
    dry_run: bool,
    format: OutputFormat,
) -> AppResult<String> {
    let report = shipit
        .canary(&CanaryOptions {
            dry_run,
            request_number: args.request_number,
            build_id: args.build.clone(),
            from: args.from.clone(),
        })
        .await?;
    render(format, canary_line(&report.version, &report.status), &report)
}

fn canary_line(version: &str, status: &CanaryStatus) -> String {
    match status {
        CanaryStatus::Failed(message) => format!("Canary {version} not published: {message}"),
        CanaryStatus::DryRun | CanaryStatus::Published => version.to_string(),
    }
}
