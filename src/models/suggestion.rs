use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Where a suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    PatternLearning,
    ContextInference,
    Default,
}

impl std::fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestionSource::PatternLearning => write!(f, "pattern_learning"),
            SuggestionSource::ContextInference => write!(f, "context_inference"),
            SuggestionSource::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSuggestion {
    pub input_text: String,
    pub confidence: f64,
    pub source: SuggestionSource,
    pub reasoning: String,
}

impl InputSuggestion {
    pub fn new(
        input_text: impl Into<String>,
        confidence: f64,
        source: SuggestionSource,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            input_text: input_text.into(),
            confidence,
            source,
            reasoning: reasoning.into(),
        }
    }

    pub fn default_source(
        input_text: impl Into<String>,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::new(input_text, confidence, SuggestionSource::Default, reasoning)
    }
}

/// Optional caller-supplied context for inference.
///
/// Only `working_directory` influences suggestions today; anything else the
/// caller sends is kept in `extra` so it round-trips untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recent_commands: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SessionContext {
    pub fn with_working_directory(dir: impl Into<String>) -> Self {
        Self {
            working_directory: Some(dir.into()),
            ..Self::default()
        }
    }
}

/// Ranked suggestions plus any safety warnings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inference {
    pub suggestions: Vec<InputSuggestion>,
    pub warnings: Vec<String>,
}
