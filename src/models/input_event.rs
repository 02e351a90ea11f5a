use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SidekickError;
use crate::validation::list_values;

/// Marker stored in place of any input typed at a password prompt.
pub const REDACTED: &str = "[REDACTED]";

/// How an input reached the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    UserTyped,
    AiSuggested,
    AutoInjected,
}

impl InputSource {
    pub fn all() -> &'static [InputSource] {
        &[
            InputSource::UserTyped,
            InputSource::AiSuggested,
            InputSource::AutoInjected,
        ]
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::UserTyped => write!(f, "user_typed"),
            InputSource::AiSuggested => write!(f, "ai_suggested"),
            InputSource::AutoInjected => write!(f, "auto_injected"),
        }
    }
}

impl std::str::FromStr for InputSource {
    type Err = SidekickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_typed" => Ok(InputSource::UserTyped),
            "ai_suggested" => Ok(InputSource::AiSuggested),
            "auto_injected" => Ok(InputSource::AutoInjected),
            _ => Err(SidekickError::invalid(format!(
                "Invalid input_source: {s}. Must be one of: {}",
                list_values(InputSource::all())
            ))),
        }
    }
}

/// One observed answer to a prompt. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEvent {
    pub event_id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub prompt_text: String,
    /// `[REDACTED]` when the prompt asked for a secret
    pub input_text: String,
    pub success: bool,
    pub input_source: InputSource,
    pub response_time_ms: u64,
}
