//! Reference prompts and the behavior expected for each

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use sidekick::detector::PromptDetector;
use sidekick::models::{PromptType, SuggestionSource};
use sidekick::SidekickError;

use super::helpers::{append, TestEnv};

#[test]
fn test_plain_password_prompt() {
    let env = TestEnv::new();
    let log = env.log("login.log", "Password: ");
    env.sidekick
        .start_monitor("login", "ssh", &log, BTreeMap::new())
        .unwrap();

    let detection = env.sidekick.detect_prompt("login", 0.70).unwrap().unwrap();
    assert_eq!(detection.prompt_type, PromptType::Password);
    assert!(detection.confidence >= 0.90);
    assert!(!detection.is_dangerous);

    let inference = env
        .sidekick
        .infer_inputs(&detection.prompt_text, "password", None)
        .unwrap();
    assert!(inference.suggestions.is_empty());
    assert!(inference
        .warnings
        .iter()
        .any(|w| w.contains("Manual password entry")));
}

#[test]
fn test_password_rule_outranks_generic_text_rule() {
    let detection = PromptDetector::default()
        .detect("Enter password: ", 0)
        .unwrap();
    assert_eq!(detection.prompt_type, PromptType::Password);
    assert!(detection.confidence >= 0.90);
}

#[test]
fn test_destructive_confirmation() {
    let env = TestEnv::new();
    let content = "WARNING: This will delete all data!\nContinue? (yes/no): ";
    let log = env.log("wipe.log", content);
    env.sidekick
        .start_monitor("wipe", "script", &log, BTreeMap::new())
        .unwrap();

    let detection = env.sidekick.detect_prompt("wipe", 0.70).unwrap().unwrap();
    assert_eq!(detection.prompt_type, PromptType::YesNo);

    let inference = env.sidekick.infer_inputs(content, "yes_no", None).unwrap();
    assert_eq!(inference.suggestions.len(), 2);
    assert_eq!(inference.suggestions[0].input_text, "no");
    assert_eq!(inference.suggestions[0].confidence, 0.85);
    assert_eq!(inference.suggestions[1].input_text, "yes");
    assert_eq!(inference.suggestions[1].confidence, 0.60);
    assert!(inference.warnings.iter().any(|w| w.contains("dangerous")));
}

#[test]
fn test_learned_answer_outranks_alternative() {
    let env = TestEnv::new();
    let prompt = "Restart service? (yes/no)";
    for _ in 0..5 {
        env.sidekick
            .track_event("ops", prompt, "no", true, "user_typed", 900)
            .unwrap();
    }
    env.sidekick
        .track_event("ops", prompt, "yes", true, "user_typed", 900)
        .unwrap();

    let inference = env.sidekick.infer_inputs(prompt, "yes_no", None).unwrap();
    let no = inference
        .suggestions
        .iter()
        .find(|s| s.input_text == "no")
        .unwrap();
    let yes = inference
        .suggestions
        .iter()
        .find(|s| s.input_text == "yes")
        .unwrap();

    assert_eq!(no.source, SuggestionSource::PatternLearning);
    assert!(no.confidence > yes.confidence);
}

#[test]
fn test_prompt_after_long_log() {
    let env = TestEnv::new();
    let mut content: String = (0..10_000)
        .map(|i| format!("[{i:05}] building target {i}\n"))
        .collect();
    content.push_str("Password: ");
    let log = env.log("build.log", &content);
    env.sidekick
        .start_monitor("build", "file", &log, BTreeMap::new())
        .unwrap();

    let start = Instant::now();
    let detection = env.sidekick.detect_prompt("build", 0.70).unwrap().unwrap();
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(detection.prompt_type, PromptType::Password);
    assert_eq!(detection.byte_position, content.len() as u64);
}

#[test]
fn test_invalid_search_regex() {
    let env = TestEnv::new();
    let log = env.log("s.log", "anything\n");
    env.sidekick
        .start_monitor("s", "file", &log, BTreeMap::new())
        .unwrap();

    let err = env
        .sidekick
        .search_history("(unclosed", None, 3, 10)
        .unwrap_err();
    assert!(matches!(err, SidekickError::InvalidArgument(_)));
    assert_eq!(err.code(), "INVALID_ARGUMENT");
}

#[test]
fn test_second_read_without_growth_is_empty() {
    let env = TestEnv::new();
    let log = env.log("s.log", "line one\n");
    env.sidekick
        .start_monitor("s", "file", &log, BTreeMap::new())
        .unwrap();

    let first = env.sidekick.get_updates("s").unwrap();
    let second = env.sidekick.get_updates("s").unwrap();
    assert_eq!(first.new_text, "line one\n");
    assert!(second.new_text.is_empty());
    assert_eq!(second.byte_position, first.byte_position);

    append(&log, "line two\n");
    let third = env.sidekick.get_updates("s").unwrap();
    assert_eq!(third.new_text, "line two\n");
}

#[test]
fn test_retention_keeps_patterns_and_recent_history() {
    use std::fs::File;
    use std::time::SystemTime;

    let env = TestEnv::new();
    env.sidekick
        .track_event("old", "Continue? (yes/no)", "yes", true, "user_typed", 100)
        .unwrap();

    let day = Duration::from_secs(86_400);
    let now = SystemTime::now() + day * 30;
    let storage = env.storage_dir();
    let history = storage.join("history").join("old.json");
    assert!(history.exists());

    // Age exactly at the boundary is kept
    File::options()
        .write(true)
        .open(&history)
        .unwrap()
        .set_modified(now - day * 7)
        .unwrap();
    let kept = env.sidekick.cleanup_at(7, false, now).unwrap();
    assert_eq!(kept.total_deleted, 0);

    File::options()
        .write(true)
        .open(&history)
        .unwrap()
        .set_modified(now - day * 8)
        .unwrap();
    let report = env.sidekick.cleanup_at(7, false, now).unwrap();
    assert_eq!(report.total_deleted, 1);
    assert!(!history.exists());
    assert!(storage.join("patterns.json").exists());

    let err = env.sidekick.cleanup(0, true).unwrap_err();
    assert!(matches!(err, SidekickError::InvalidArgument(_)));
}
