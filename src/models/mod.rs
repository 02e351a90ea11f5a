pub mod input_event;
pub mod pattern;
pub mod prompt;
pub mod session;
pub mod suggestion;

pub use input_event::{InputEvent, InputSource, REDACTED};
pub use pattern::{pattern_id, Pattern, ResponseStats};
pub use prompt::{PromptDetection, PromptType};
pub use session::{Session, SessionState, SessionStats, SessionType, SessionUpdate};
pub use suggestion::{Inference, InputSuggestion, SessionContext, SuggestionSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_type_round_trip_strings() {
        for prompt_type in PromptType::all() {
            let parsed: PromptType = prompt_type.to_string().parse().unwrap();
            assert_eq!(&parsed, prompt_type);
        }
    }

    #[test]
    fn test_prompt_type_invalid_lists_values() {
        let err = "question".parse::<PromptType>().unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert!(err.to_string().contains("password, yes_no, choice"));
    }

    #[test]
    fn test_input_source_parse() {
        assert_eq!(
            "ai_suggested".parse::<InputSource>().unwrap(),
            InputSource::AiSuggested
        );
        let err = "keyboard".parse::<InputSource>().unwrap_err();
        assert!(err.to_string().contains("user_typed, ai_suggested, auto_injected"));
    }

    #[test]
    fn test_enum_serde_names_match_display() {
        assert_eq!(
            serde_json::to_value(PromptType::YesNo).unwrap(),
            serde_json::json!("yes_no")
        );
        assert_eq!(
            serde_json::to_value(InputSource::AutoInjected).unwrap(),
            serde_json::json!("auto_injected")
        );
        assert_eq!(
            serde_json::to_value(SuggestionSource::ContextInference).unwrap(),
            serde_json::json!("context_inference")
        );
    }

    #[test]
    fn test_session_context_keeps_extra_fields() {
        let context: SessionContext = serde_json::from_value(serde_json::json!({
            "working_directory": "/var/www/app",
            "recent_commands": ["git pull"],
            "host": "web01"
        }))
        .unwrap();

        assert_eq!(context.working_directory.as_deref(), Some("/var/www/app"));
        assert_eq!(context.recent_commands, vec!["git pull".to_string()]);
        assert_eq!(context.extra["host"], "web01");
    }
}
