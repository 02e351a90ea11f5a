use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use super::{print_inference, print_json, CommandContext};

/// Arguments for `sidekick watch`
#[derive(Debug, Clone)]
pub struct WatchArgs {
    pub file: PathBuf,
    pub session_id: Option<String>,
    pub min_confidence: Option<f64>,
    pub interval_ms: u64,
    /// Stop after the first poll
    pub once: bool,
}

/// Tail a log and print each detected prompt with suggestions.
///
/// Runs until interrupted or until the log disappears.
pub fn execute(ctx: &CommandContext, args: WatchArgs) -> Result<()> {
    let sidekick = ctx.open()?;
    let session_id = args.session_id.unwrap_or_else(|| "watch".to_string());
    let min_confidence = args.min_confidence.unwrap_or(ctx.config.min_confidence);

    sidekick
        .start_monitor(&session_id, "file", &args.file, BTreeMap::new())
        .with_context(|| format!("Cannot watch {}", args.file.display()))?;

    if !ctx.json {
        println!(
            "{} Watching {} {}",
            "→".cyan(),
            args.file.display(),
            "(Ctrl-C to stop)".dimmed()
        );
    }

    loop {
        if let Some(detection) = sidekick.detect_prompt(&session_id, min_confidence)? {
            let inference = sidekick.infer_inputs(
                &detection.prompt_text,
                &detection.prompt_type.to_string(),
                None,
            )?;

            if ctx.json {
                print_json(&json!({ "prompt": detection, "inference": inference }))?;
            } else {
                println!();
                println!(
                    "{} {} {}",
                    detection.prompt_type.to_string().cyan().bold(),
                    detection.prompt_text.bold(),
                    format!("({:.2})", detection.confidence).dimmed()
                );
                print_inference(&inference);
            }
        }

        if args.once {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(args.interval_ms));
    }
}
