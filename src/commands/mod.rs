//! CLI command implementations.

pub mod cleanup;
pub mod detect;
pub mod patterns;
pub mod search;
pub mod suggest;
pub mod track;
pub mod watch;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

use crate::config::{default_config_path, SidekickConfig};
use crate::error::SidekickError;
use crate::models::{Inference, SuggestionSource};
use crate::service::Sidekick;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: SidekickConfig,
    /// Emit machine-readable JSON instead of colored text
    pub json: bool,
}

impl CommandContext {
    /// Load config from `config_path`, or the platform default location.
    pub fn load(config_path: Option<PathBuf>, json: bool) -> Result<Self> {
        let config = match config_path.or_else(default_config_path) {
            Some(path) => SidekickConfig::load(&path)?,
            None => SidekickConfig::default(),
        }
        .resolve();
        config.validate()?;

        Ok(Self { config, json })
    }

    pub fn open(&self) -> Result<Sidekick> {
        Sidekick::open(&self.config).with_context(|| {
            format!(
                "Failed to open storage at {}",
                self.config.storage_dir.display()
            )
        })
    }
}

/// Stable code of the first [`SidekickError`] in the chain.
///
/// Failures that never reached the core (config parsing, output) report
/// `INTERNAL_ERROR`.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<SidekickError>())
        .map(SidekickError::code)
        .unwrap_or("INTERNAL_ERROR")
}

/// Print a failed command as `{"error": {"code", "message"}}` on stdout.
pub fn print_error_json(err: &anyhow::Error) -> Result<()> {
    print_json(&json!({
        "error": {
            "code": error_code(err),
            "message": format!("{err:#}"),
        }
    }))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

pub(crate) fn print_inference(inference: &Inference) {
    for warning in &inference.warnings {
        println!("{} {}", "⚠".yellow().bold(), warning.yellow());
    }

    if inference.suggestions.is_empty() {
        println!("{}", "No suggestions".dimmed());
        return;
    }

    for (i, suggestion) in inference.suggestions.iter().enumerate() {
        let source = match suggestion.source {
            SuggestionSource::PatternLearning => suggestion.source.to_string().green(),
            SuggestionSource::ContextInference => suggestion.source.to_string().cyan(),
            SuggestionSource::Default => suggestion.source.to_string().dimmed(),
        };
        println!(
            "  {}. {} {} [{}]",
            i + 1,
            suggestion.input_text.bold(),
            format!("({:.2})", suggestion.confidence).dimmed(),
            source
        );
        println!("     {}", suggestion.reasoning.dimmed());
    }
}
