use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

use super::{print_json, CommandContext};
use crate::detector::PromptDetector;
use crate::fs::tail;

/// Scan a whole log file once and report the prompt at its tail.
pub fn execute(
    ctx: &CommandContext,
    file: PathBuf,
    min_confidence: Option<f64>,
    context_lines: Option<usize>,
) -> Result<()> {
    let min_confidence = min_confidence.unwrap_or(ctx.config.min_confidence);
    let context_lines = context_lines.unwrap_or(ctx.config.context_lines);
    crate::validation::validate_context_lines(context_lines)?;

    let read = tail::read_new(&file, 0)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let found = PromptDetector::new(min_confidence).detect_with_context(
        &read.text,
        read.position,
        context_lines,
    );

    if ctx.json {
        let (prompt, context) = match &found {
            Some((detection, context)) => (Some(detection), context.clone()),
            None => (None, Vec::new()),
        };
        return print_json(&json!({
            "detected": found.is_some(),
            "prompt": prompt,
            "context": context,
        }));
    }

    let Some((detection, context)) = found else {
        println!("{}", "No prompt detected".dimmed());
        return Ok(());
    };

    println!(
        "{} {} prompt {}",
        "✓".green(),
        detection.prompt_type.to_string().cyan().bold(),
        format!("(confidence {:.2})", detection.confidence).dimmed()
    );
    println!("  {} {}", "text:".dimmed(), detection.prompt_text);
    if detection.is_dangerous {
        println!("  {}", "dangerous operation".red().bold());
    }
    println!("  {}", "context:".dimmed());
    for line in context {
        println!("    {line}");
    }
    Ok(())
}
