//! Heuristic prompt detection over the tail of session output.
//!
//! Rules are tried in a fixed priority order and the first rule that both
//! matches and clears the confidence threshold wins. A more confident rule
//! further down the table never overrides an earlier match.

use chrono::Utc;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

use crate::models::{PromptDetection, PromptType};
use crate::security::is_dangerous_operation;

/// Only this many trailing lines are scanned.
pub const TAIL_LINES: usize = 50;

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.70;

pub const DEFAULT_CONTEXT_LINES: usize = 3;

struct RuleDef {
    pattern: &'static str,
    prompt_type: PromptType,
    confidence: f64,
    /// Numbered-list rule matches line starts and is case-sensitive
    multi_line: bool,
}

const RULES: &[RuleDef] = &[
    RuleDef {
        pattern: r"password\s*:",
        prompt_type: PromptType::Password,
        confidence: 0.95,
        multi_line: false,
    },
    RuleDef {
        pattern: r"passphrase\s*:",
        prompt_type: PromptType::Password,
        confidence: 0.95,
        multi_line: false,
    },
    RuleDef {
        pattern: r"enter\s+(?:your\s+)?password",
        prompt_type: PromptType::Password,
        confidence: 0.92,
        multi_line: false,
    },
    RuleDef {
        pattern: r"\(yes/no\)|\[y/n\]|\(y/n\)",
        prompt_type: PromptType::YesNo,
        confidence: 0.90,
        multi_line: false,
    },
    RuleDef {
        pattern: r"continue\?|proceed\?|confirm\?",
        prompt_type: PromptType::YesNo,
        confidence: 0.85,
        multi_line: false,
    },
    RuleDef {
        pattern: r"enter\s+(?:file\s+)?path\s*:|(?:file|directory)\s+path\s*:",
        prompt_type: PromptType::Path,
        confidence: 0.88,
        multi_line: false,
    },
    RuleDef {
        pattern: r"(?:file|directory)\s+name\s*:",
        prompt_type: PromptType::Path,
        confidence: 0.82,
        multi_line: false,
    },
    RuleDef {
        pattern: r"^\s*\[\d+\].*(?:\n\s*\[\d+\].*)+",
        prompt_type: PromptType::Choice,
        confidence: 0.82,
        multi_line: true,
    },
    RuleDef {
        pattern: r"enter\s+command\s*:|command\s*:",
        prompt_type: PromptType::Command,
        confidence: 0.85,
        multi_line: false,
    },
    RuleDef {
        pattern: r"enter\s+\w+\s*:|input\s*:",
        prompt_type: PromptType::Text,
        confidence: 0.75,
        multi_line: false,
    },
];

struct PromptRule {
    regex: Regex,
    def: &'static RuleDef,
}

static PROMPT_RULES: LazyLock<Vec<PromptRule>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|def| PromptRule {
            regex: RegexBuilder::new(def.pattern)
                .case_insensitive(!def.multi_line)
                .multi_line(def.multi_line)
                .build()
                .expect("valid prompt regex"),
            def,
        })
        .collect()
});

#[derive(Debug, Clone, Copy)]
pub struct PromptDetector {
    min_confidence: f64,
}

impl Default for PromptDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE)
    }
}

impl PromptDetector {
    /// `min_confidence` is expected in `[0, 1]`; callers validate at the edge.
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// First confident prompt in the last [`TAIL_LINES`] lines of `content`.
    pub fn detect(&self, content: &str, byte_position: u64) -> Option<PromptDetection> {
        if content.is_empty() {
            return None;
        }

        let window = tail_window(content);

        for rule in PROMPT_RULES.iter() {
            if rule.def.confidence < self.min_confidence {
                continue;
            }
            let Some(found) = rule.regex.find(&window) else {
                continue;
            };

            let prompt_text = found.as_str().trim().to_string();
            let is_dangerous = is_dangerous_operation(&prompt_text);
            return Some(PromptDetection {
                prompt_text,
                confidence: rule.def.confidence,
                prompt_type: rule.def.prompt_type,
                matched_pattern: rule.def.pattern.to_string(),
                byte_position,
                timestamp: Utc::now(),
                is_dangerous,
            });
        }

        None
    }

    /// Like [`detect`](Self::detect), plus the lines surrounding the prompt.
    ///
    /// The prompt is located as the first line of the whole buffer that
    /// contains the detected text. When no such line exists the trailing
    /// `context_lines + 1` lines are returned instead.
    pub fn detect_with_context(
        &self,
        content: &str,
        byte_position: u64,
        context_lines: usize,
    ) -> Option<(PromptDetection, Vec<String>)> {
        let detection = self.detect(content, byte_position)?;

        let lines: Vec<&str> = content.split('\n').collect();
        let context = match lines
            .iter()
            .position(|line| line.contains(detection.prompt_text.as_str()))
        {
            Some(idx) => {
                let start = idx.saturating_sub(context_lines);
                let end = (idx + context_lines + 1).min(lines.len());
                &lines[start..end]
            }
            None => {
                let start = lines.len().saturating_sub(context_lines + 1);
                &lines[start..]
            }
        };

        Some((
            detection,
            context.iter().map(|line| line.to_string()).collect(),
        ))
    }
}

fn tail_window(content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let start = lines.len().saturating_sub(TAIL_LINES);
    lines[start..].join("\n")
}
