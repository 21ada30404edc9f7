//! Text and JSON rendering for CLI commands.

use serde::Serialize;

use shipit_core::result::AppResult;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text, suitable for scripts
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Renders `text` or, for JSON, `item`.
pub fn render<T: Serialize>(format: OutputFormat, text: String, item: &T) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(text),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
    }
}
