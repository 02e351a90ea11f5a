//! End-to-end session workflow: monitor, detect, suggest, learn

use std::collections::BTreeMap;

use sidekick::models::{InputSource, PromptType, SessionState, SuggestionSource};
use sidekick::SidekickError;

use super::helpers::{append, TestEnv};

#[test]
fn test_full_session_workflow() {
    let env = TestEnv::new();
    let log = env.log("deploy.log", "Deploying release 4.2\n");
    let session = env
        .sidekick
        .start_monitor("deploy", "script", &log, BTreeMap::new())
        .unwrap();
    assert_eq!(session.state, SessionState::Active);
    assert_eq!(session.byte_position, 0);

    // No prompt yet
    assert!(env.sidekick.detect_prompt("deploy", 0.70).unwrap().is_none());

    append(&log, "Overwrite existing config? [y/N] ");
    let detection = env.sidekick.detect_prompt("deploy", 0.70).unwrap().unwrap();
    assert_eq!(detection.prompt_type, PromptType::YesNo);
    assert_eq!(
        env.sidekick.get_session("deploy").unwrap().byte_position,
        detection.byte_position
    );

    let before = env
        .sidekick
        .infer_inputs(&detection.prompt_text, "yes_no", None)
        .unwrap();
    assert!(before
        .suggestions
        .iter()
        .all(|s| s.source != SuggestionSource::PatternLearning));

    let tracked = env
        .sidekick
        .track_event(
            "deploy",
            &detection.prompt_text,
            "y",
            true,
            "ai_suggested",
            1_200,
        )
        .unwrap();
    assert!(tracked.recorded);
    assert!(tracked.pattern_updated);

    let after = env
        .sidekick
        .infer_inputs(&detection.prompt_text, "yes_no", None)
        .unwrap();
    let learned = &after.suggestions[0];
    assert_eq!(learned.input_text, "y");
    assert_eq!(learned.source, SuggestionSource::PatternLearning);

    let history = env.sidekick.session_history("deploy").unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].event_id, tracked.event_id);
    assert_eq!(history[0].input_source, InputSource::AiSuggested);

    let stats = env.sidekick.stop_monitor("deploy", false).unwrap();
    assert_eq!(stats.state, SessionState::Stopped);
    assert_eq!(stats.total_bytes_processed, detection.byte_position);
    assert!(!log.exists());
    assert!(matches!(
        env.sidekick.get_session("deploy"),
        Err(SidekickError::NotFound(_))
    ));
}

#[test]
fn test_stop_keeps_log_when_requested() {
    let env = TestEnv::new();
    let log = env.log("keep.log", "output\n");
    env.sidekick
        .start_monitor("keep", "file", &log, BTreeMap::new())
        .unwrap();

    env.sidekick.stop_monitor("keep", true).unwrap();
    assert!(log.exists());
}

#[test]
fn test_patterns_and_history_survive_restart() {
    let env = TestEnv::new();
    let prompt = "Continue? (yes/no)";
    env.sidekick
        .track_event("first", prompt, "yes", true, "user_typed", 300)
        .unwrap();
    env.sidekick
        .track_event("first", prompt, "yes", true, "user_typed", 250)
        .unwrap();

    let restarted = env.restart();
    let list = restarted.get_patterns(None, 1, "occurrences").unwrap();
    assert_eq!(list.total_patterns, 1);
    assert_eq!(list.patterns[0].total_occurrences, 2);

    let history = restarted.session_history("first").unwrap();
    assert_eq!(history.len(), 2);

    let inference = restarted.infer_inputs(prompt, "yes_no", None).unwrap();
    assert_eq!(inference.suggestions[0].input_text, "yes");
    assert_eq!(
        inference.suggestions[0].source,
        SuggestionSource::PatternLearning
    );
}

#[test]
fn test_password_responses_never_reach_disk() {
    let env = TestEnv::new();
    env.sidekick
        .track_event("vault", "Password:", "hunter2", true, "user_typed", 800)
        .unwrap();

    let history = env.sidekick.session_history("vault").unwrap();
    assert_eq!(history.len(), 1);
    assert_ne!(history[0].input_text, "hunter2");

    for entry in walk(&env.storage_dir()) {
        let content = std::fs::read_to_string(&entry).unwrap();
        assert!(!content.contains("hunter2"), "{} leaks", entry.display());
    }
    assert_eq!(
        env.sidekick
            .get_patterns(None, 1, "occurrences")
            .unwrap()
            .total_patterns,
        0
    );
}

#[test]
fn test_search_across_sessions() {
    let env = TestEnv::new();
    let a = env.log("a.log", "boot\nerror: disk full\nretry\n");
    let b = env.log("b.log", "error: timeout\n");
    env.sidekick
        .start_monitor("a", "file", &a, BTreeMap::new())
        .unwrap();
    env.sidekick
        .start_monitor("b", "file", &b, BTreeMap::new())
        .unwrap();

    let results = env.sidekick.search_history("error:", None, 1, 10).unwrap();
    assert_eq!(results.total_matches, 2);
    assert_eq!(results.searched_sessions, vec!["a", "b"]);
    assert_eq!(results.matches[0].session_id.as_deref(), Some("a"));
    assert_eq!(results.matches[0].context_before, vec!["boot"]);
    assert_eq!(results.matches[0].context_after, vec!["retry"]);

    let only_b = env
        .sidekick
        .search_history("error:", Some("b"), 0, 10)
        .unwrap();
    assert_eq!(only_b.total_matches, 1);
    assert_eq!(only_b.matches[0].matched_text, "error: timeout");
}

fn walk(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(walk(&path));
        } else {
            files.push(path);
        }
    }
    files
}
