//! Request commands: comment, label, labels, pr-check.

use clap::Args;
use serde_json::json;

use shipit_core::result::AppResult;
use shipit_core::types::StatusState;
use shipit_release::{CommentOptions, Shipit};

use super::output::{OutputFormat, render};

/// Request to act on
#[derive(Debug, Default, Args)]
pub struct RequestArgs {
    /// Request number; defaults to the CI request
    #[arg(long = "pr")]
    pub number: Option<u64>,
}

/// Arguments for `comment`
#[derive(Debug, Args)]
pub struct CommentArgs {
    #[command(flatten)]
    pub request: RequestArgs,
    /// Tracked comment context
    #[arg(long, default_value = "default")]
    pub context: String,
    /// Comment body
    #[arg(short, long, required_unless_present = "delete")]
    pub message: Option<String>,
    /// Delete the tracked comment
    #[arg(long, conflicts_with = "message")]
    pub delete: bool,
    /// Edit the comment in place instead of re-posting it
    #[arg(long)]
    pub edit: bool,
}

/// Arguments for `label`
#[derive(Debug, Args)]
pub struct LabelArgs {
    #[command(flatten)]
    pub request: RequestArgs,
    /// Label to add
    pub label: String,
}

/// `comment`: prints nothing.
pub async fn comment(shipit: &Shipit, args: &CommentArgs, dry_run: bool) -> AppResult<String> {
    shipit
        .comment(&CommentOptions {
            number: args.request.number,
            context: args.context.clone(),
            message: args.message.clone(),
            delete: args.delete,
            edit: args.edit,
            dry_run,
        })
        .await?;
    Ok(String::new())
}

/// `label`: whether the label was (or would be) added.
pub async fn label(
    shipit: &Shipit,
    args: &LabelArgs,
    dry_run: bool,
    format: OutputFormat,
) -> AppResult<String> {
    let added = shipit.label(args.request.number, &args.label, dry_run).await?;
    let text = match (added, dry_run) {
        (true, true) => format!("Would add '{}'", args.label),
        (true, false) => format!("Added '{}'", args.label),
        (false, _) => format!("'{}' already present", args.label),
    };
    render(
        format,
        text,
        &json!({ "label": args.label, "added": added, "dry_run": dry_run }),
    )
}

/// `labels`: one label per line.
pub async fn labels(shipit: &Shipit, args: &RequestArgs, format: OutputFormat) -> AppResult<String> {
    let labels = shipit.labels(args.number).await?;
    render(format, labels.join("\n"), &labels)
}

/// `pr-check`: the reported state and description.
pub async fn pr_check(
    shipit: &Shipit,
    args: &RequestArgs,
    dry_run: bool,
    format: OutputFormat,
) -> AppResult<String> {
    let status = shipit.pr_check(args.number, dry_run).await?;
    let state = match status.state {
        StatusState::Pending => "pending",
        StatusState::Success => "success",
        StatusState::Failure => "failure",
        StatusState::Error => "error",
    };
    render(format, format!("{state}: {}", status.description), &status)
}
