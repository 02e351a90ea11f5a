use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use super::{print_json, CommandContext};
use crate::validation::MAX_ID_LENGTH;

pub fn execute(
    ctx: &CommandContext,
    query: String,
    files: Vec<PathBuf>,
    context_lines: usize,
    max_results: usize,
) -> Result<()> {
    let sidekick = ctx.open()?;

    let mut used = HashSet::new();
    for file in &files {
        let id = unique_session_id(file, &mut used);
        sidekick
            .start_monitor(&id, "file", file, BTreeMap::new())
            .with_context(|| format!("Cannot search {}", file.display()))?;
    }

    let results = sidekick.search_history(&query, None, context_lines, max_results)?;

    if ctx.json {
        return print_json(&results);
    }

    for m in &results.matches {
        let session = m.session_id.as_deref().unwrap_or("-");
        println!(
            "{}:{}",
            session.cyan(),
            m.line_number.to_string().yellow()
        );
        for line in &m.context_before {
            println!("  {}", line.dimmed());
        }
        println!("  {}", m.matched_text.bold());
        for line in &m.context_after {
            println!("  {}", line.dimmed());
        }
    }
    println!(
        "{} match(es) in {} session(s)",
        results.total_matches.to_string().bold(),
        results.searched_sessions.len()
    );
    Ok(())
}

/// Session id derived from the file stem, restricted to the id alphabet.
fn unique_session_id(path: &Path, used: &mut HashSet<String>) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut base: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_ID_LENGTH - 8)
        .collect();
    if base.is_empty() || crate::validation::validate_id(&base).is_err() {
        base = format!("log_{base}");
    }

    let mut id = base.clone();
    let mut n = 2;
    while !used.insert(id.clone()) {
        id = format!("{base}-{n}");
        n += 1;
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_from_paths() {
        let mut used = HashSet::new();
        assert_eq!(
            unique_session_id(Path::new("/var/log/ssh prod.log"), &mut used),
            "ssh_prod"
        );
        assert_eq!(
            unique_session_id(Path::new("/tmp/ssh prod.txt"), &mut used),
            "ssh_prod-2"
        );
        assert_eq!(unique_session_id(Path::new("/tmp/con.log"), &mut used), "log_con");
        assert_eq!(
            unique_session_id(Path::new("/tmp/web01.prod.log"), &mut used),
            "web01.prod"
        );
    }
}
