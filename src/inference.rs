//! Suggestion engine: learned responses first, type-specific defaults after.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::{
    Inference, InputSuggestion, Pattern, PromptType, SessionContext, SuggestionSource,
};
use crate::patterns::PatternStore;
use crate::security::{get_dangerous_keywords, is_dangerous_operation};

pub const PASSWORD_WARNING: &str =
    "Security: Manual password entry required. Never auto-suggest passwords.";

pub const UNKNOWN_WARNING: &str = "Unknown prompt type - manual input required";

const FREQUENCY_WEIGHT: f64 = 0.70;
const SUCCESS_WEIGHT: f64 = 0.30;
/// Patterns seen at least this often get [`EXPERIENCE_BOOST`].
const EXPERIENCE_THRESHOLD: u64 = 10;
const EXPERIENCE_BOOST: f64 = 0.05;
const MAX_LEARNED_CONFIDENCE: f64 = 0.95;

/// Recent commands offered for a command prompt.
const MAX_RECENT_COMMANDS: usize = 3;

const COMMON_COMMANDS: &[(&str, &str)] = &[
    ("help", "Display help information"),
    ("exit", "Exit the current session"),
    ("status", "Check status"),
    ("ls", "List directory contents"),
];

static CHOICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("valid choice regex"));

/// Produces ranked input suggestions for a detected prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionEngine<'a> {
    patterns: Option<&'a PatternStore>,
}

impl<'a> SuggestionEngine<'a> {
    /// Engine with defaults only.
    pub fn new() -> Self {
        Self { patterns: None }
    }

    /// Engine that also draws on learned patterns.
    pub fn with_patterns(patterns: &'a PatternStore) -> Self {
        Self {
            patterns: Some(patterns),
        }
    }

    pub fn infer_inputs(
        &self,
        prompt_text: &str,
        prompt_type: PromptType,
        context: Option<&SessionContext>,
    ) -> Inference {
        let mut warnings = Vec::new();
        let dangerous = is_dangerous_operation(prompt_text);
        if dangerous {
            warnings.push(format!(
                "Dangerous operation detected: this prompt involves potentially dangerous, \
                 destructive actions ({}). Review carefully before proceeding.",
                get_dangerous_keywords(prompt_text).join(", ")
            ));
        }

        let working_directory = context.and_then(|c| c.working_directory.as_deref());
        let defaults = match prompt_type {
            PromptType::Password => {
                warnings.push(PASSWORD_WARNING.to_string());
                Vec::new()
            }
            PromptType::YesNo => yes_no_defaults(dangerous, working_directory),
            PromptType::Choice => choice_defaults(prompt_text),
            PromptType::Path => path_defaults(working_directory),
            PromptType::Command => command_defaults(context),
            PromptType::Text => Vec::new(),
            PromptType::Unknown => {
                warnings.push(UNKNOWN_WARNING.to_string());
                Vec::new()
            }
        };

        let learned = self
            .patterns
            .and_then(|store| store.get_pattern_by_prompt(prompt_text))
            .map(learned_suggestions)
            .unwrap_or_default();

        Inference {
            suggestions: merge(learned, defaults),
            warnings,
        }
    }
}

/// Learned suggestions in count-descending, text-ascending order.
fn learned_suggestions(pattern: &Pattern) -> Vec<InputSuggestion> {
    let total = pattern.total_occurrences;
    if total == 0 {
        return Vec::new();
    }

    pattern
        .ranked_responses()
        .into_iter()
        .map(|(text, stats)| {
            let frequency = stats.count as f64 / total as f64;
            let success_rate = stats.success_rate();
            let mut confidence = FREQUENCY_WEIGHT * frequency + SUCCESS_WEIGHT * success_rate;
            if total >= EXPERIENCE_THRESHOLD {
                confidence = (confidence + EXPERIENCE_BOOST).min(MAX_LEARNED_CONFIDENCE);
            }

            InputSuggestion::new(
                text,
                confidence,
                SuggestionSource::PatternLearning,
                format!(
                    "Learned from pattern: used {}/{} times ({:.0}%), {:.0}% success rate",
                    stats.count,
                    total,
                    frequency * 100.0,
                    success_rate * 100.0
                ),
            )
        })
        .collect()
}

/// Learned suggestions win; defaults they cover are dropped.
/// Learned first, then defaults, keeping the first suggestion for each text.
fn merge(learned: Vec<InputSuggestion>, defaults: Vec<InputSuggestion>) -> Vec<InputSuggestion> {
    let mut seen = HashSet::new();
    learned
        .into_iter()
        .chain(defaults)
        .filter(|s| seen.insert(s.input_text.clone()))
        .collect()
}

fn yes_no_defaults(dangerous: bool, working_directory: Option<&str>) -> Vec<InputSuggestion> {
    if dangerous {
        return vec![
            InputSuggestion::default_source(
                "no",
                0.85,
                "Recommended: Dangerous operation detected. Saying 'no' is the safer choice.",
            ),
            InputSuggestion::default_source(
                "yes",
                0.60,
                "Proceed with caution: this will execute a potentially dangerous operation.",
            ),
        ];
    }

    let context = working_directory
        .map(|dir| format!(" (working directory: {dir})"))
        .unwrap_or_default();
    vec![
        InputSuggestion::default_source("yes", 0.75, format!("Confirm the operation{context}")),
        InputSuggestion::default_source("no", 0.75, format!("Cancel the operation{context}")),
    ]
}

fn choice_defaults(prompt_text: &str) -> Vec<InputSuggestion> {
    CHOICE_NUMBER
        .captures_iter(prompt_text)
        .map(|caps| {
            let number = &caps[1];
            InputSuggestion::default_source(number, 0.80, format!("Select option {number}"))
        })
        .collect()
}

/// Recent commands from the session context, newest first, then common ones.
fn command_defaults(context: Option<&SessionContext>) -> Vec<InputSuggestion> {
    let recent = context
        .map(|c| c.recent_commands.as_slice())
        .unwrap_or_default();

    recent
        .iter()
        .rev()
        .map(|s| s.trim())
        .filter(|cmd| !cmd.is_empty())
        .take(MAX_RECENT_COMMANDS)
        .map(|cmd| {
            InputSuggestion::new(
                cmd,
                0.65,
                SuggestionSource::ContextInference,
                "Recently run in this session",
            )
        })
        .chain(COMMON_COMMANDS.iter().map(|(cmd, description)| {
            InputSuggestion::default_source(*cmd, 0.60, *description)
        }))
        .collect()
}

fn path_defaults(working_directory: Option<&str>) -> Vec<InputSuggestion> {
    let mut suggestions = Vec::with_capacity(4);
    if let Some(dir) = working_directory {
        suggestions.push(InputSuggestion::new(
            dir,
            0.80,
            SuggestionSource::ContextInference,
            "Current working directory from session context",
        ));
    }
    suggestions.extend([
        InputSuggestion::default_source("./", 0.70, "Current directory (relative path)"),
        InputSuggestion::default_source("/tmp/", 0.65, "Temporary directory"),
        InputSuggestion::default_source("/home/", 0.65, "Home directory"),
    ]);
    suggestions
}
