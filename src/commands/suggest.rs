use anyhow::Result;
use colored::Colorize;

use super::{print_inference, print_json, CommandContext};
use crate::models::SessionContext;

pub fn execute(
    ctx: &CommandContext,
    prompt: String,
    prompt_type: String,
    cwd: Option<String>,
) -> Result<()> {
    let sidekick = ctx.open()?;
    let context = cwd.map(SessionContext::with_working_directory);
    let inference = sidekick.infer_inputs(&prompt, &prompt_type, context.as_ref())?;

    if ctx.json {
        return print_json(&inference);
    }

    println!("{} {}", "Prompt:".bold(), prompt);
    print_inference(&inference);
    Ok(())
}
