use anyhow::Result;
use colored::Colorize;

use super::{print_json, CommandContext};

/// Arguments for `sidekick track`
#[derive(Debug, Clone)]
pub struct TrackArgs {
    pub session_id: String,
    pub prompt: String,
    pub input: String,
    pub failed: bool,
    pub source: String,
    pub response_time_ms: u64,
}

pub fn execute(ctx: &CommandContext, args: TrackArgs) -> Result<()> {
    let sidekick = ctx.open()?;
    let result = sidekick.track_event(
        &args.session_id,
        &args.prompt,
        &args.input,
        !args.failed,
        &args.source,
        args.response_time_ms,
    )?;

    if ctx.json {
        return print_json(&result);
    }

    println!(
        "{} Recorded event {}",
        "✓".green(),
        result.event_id.dimmed()
    );
    if result.pattern_updated {
        println!("  pattern updated for '{}'", args.prompt.cyan());
    } else {
        println!("  {}", "input redacted, pattern not updated".yellow());
    }
    Ok(())
}
