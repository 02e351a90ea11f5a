use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SidekickError;
use crate::validation::list_values;

/// Kind of input a detected prompt is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptType {
    Password,
    YesNo,
    Choice,
    Path,
    Command,
    Text,
    Unknown,
}

impl PromptType {
    pub fn all() -> &'static [PromptType] {
        &[
            PromptType::Password,
            PromptType::YesNo,
            PromptType::Choice,
            PromptType::Path,
            PromptType::Command,
            PromptType::Text,
            PromptType::Unknown,
        ]
    }
}

impl std::fmt::Display for PromptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptType::Password => write!(f, "password"),
            PromptType::YesNo => write!(f, "yes_no"),
            PromptType::Choice => write!(f, "choice"),
            PromptType::Path => write!(f, "path"),
            PromptType::Command => write!(f, "command"),
            PromptType::Text => write!(f, "text"),
            PromptType::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for PromptType {
    type Err = SidekickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(PromptType::Password),
            "yes_no" => Ok(PromptType::YesNo),
            "choice" => Ok(PromptType::Choice),
            "path" => Ok(PromptType::Path),
            "command" => Ok(PromptType::Command),
            "text" => Ok(PromptType::Text),
            "unknown" => Ok(PromptType::Unknown),
            _ => Err(SidekickError::invalid(format!(
                "Invalid prompt_type: {s}. Must be one of: {}",
                list_values(PromptType::all())
            ))),
        }
    }
}

/// A prompt found near the tail of session output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDetection {
    pub prompt_text: String,
    pub confidence: f64,
    pub prompt_type: PromptType,
    /// Source of the regex that matched, for debugging
    pub matched_pattern: String,
    pub byte_position: u64,
    pub timestamp: DateTime<Utc>,
    pub is_dangerous: bool,
}
