use anyhow::Result;
use colored::Colorize;

use super::{print_json, CommandContext};

pub fn execute(
    ctx: &CommandContext,
    filter: Option<String>,
    min_occurrences: u64,
    sort_by: String,
) -> Result<()> {
    let sidekick = ctx.open()?;
    let list = sidekick.get_patterns(filter.as_deref(), min_occurrences, &sort_by)?;

    if ctx.json {
        return print_json(&list);
    }

    if list.patterns.is_empty() {
        println!("{}", "No learned patterns".dimmed());
        return Ok(());
    }

    println!("{} learned pattern(s)", list.total_patterns.to_string().bold());
    for pattern in &list.patterns {
        println!();
        println!(
            "{} {}",
            pattern.prompt_text.cyan(),
            format!(
                "({} occurrences, last seen {})",
                pattern.total_occurrences,
                pattern.last_seen.format("%Y-%m-%d %H:%M:%S")
            )
            .dimmed()
        );
        for response in &pattern.all_responses {
            println!(
                "  {:<20} {:>4}x  {:>5.1}% success",
                response.input_text,
                response.count,
                response.success_rate * 100.0
            );
        }
    }
    Ok(())
}
