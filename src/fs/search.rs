//! Line-oriented regex search over session logs.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, SidekickError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Set by the caller when searching across sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// 1-based
    pub line_number: usize,
    /// The whole matching line
    pub matched_text: String,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub matches: Vec<SearchMatch>,
    pub total_matches: usize,
    pub searched_sessions: Vec<String>,
}

/// Compile a user-supplied query, surfacing syntax errors as `InvalidArgument`.
pub fn compile_query(query: &str) -> Result<Regex> {
    Regex::new(query).map_err(|e| SidekickError::invalid(format!("Invalid regex pattern: {e}")))
}

/// Matching lines of `path` in file order, at most `max_results`.
pub fn search_log_file(
    path: &Path,
    query: &Regex,
    context_lines: usize,
    max_results: usize,
) -> Result<Vec<SearchMatch>> {
    let bytes = fs::read(path).map_err(|e| SidekickError::from_file_io(e, path))?;
    let content = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = content.lines().collect();

    let mut matches = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if matches.len() >= max_results {
            break;
        }
        if !query.is_match(line) {
            continue;
        }

        let before_start = idx.saturating_sub(context_lines);
        let after_end = (idx + 1 + context_lines).min(lines.len());
        matches.push(SearchMatch {
            session_id: None,
            line_number: idx + 1,
            matched_text: line.to_string(),
            context_before: lines[before_start..idx].iter().map(|s| s.to_string()).collect(),
            context_after: lines[idx + 1..after_end]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        });
    }

    Ok(matches)
}
