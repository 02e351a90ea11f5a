use anyhow::Result;
use colored::Colorize;

use super::{print_json, CommandContext};

pub fn execute(ctx: &CommandContext, retention_days: Option<u32>, dry_run: bool) -> Result<()> {
    let retention_days = retention_days.unwrap_or(ctx.config.retention_days);
    let sidekick = ctx.open()?;
    let report = sidekick.cleanup(retention_days, dry_run)?;

    if ctx.json {
        return print_json(&report);
    }

    let action = if dry_run { "Would delete" } else { "Deleted" };
    for name in &report.deleted_sessions {
        println!("  {} {}", "-".red(), name);
    }
    println!(
        "{} {} {} file(s), {} bytes (older than {} days)",
        "✓".green(),
        action,
        report.total_deleted,
        report.bytes_freed,
        retention_days
    );
    Ok(())
}
