//! The `Sidekick` context object.
//!
//! Owns the session table and the pattern store and exposes every operation
//! the transport layer calls. Arguments arrive as loosely typed values and are
//! validated here before reaching the core components.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use crate::config::SidekickConfig;
use crate::detector::PromptDetector;
use crate::error::{Result, SidekickError};
use crate::fs::retention::{cleanup_old_files, CleanupReport};
use crate::fs::search::{compile_query, search_log_file, SearchResults};
use crate::fs::storage::{BlobStore, FsBlobStore};
use crate::inference::SuggestionEngine;
use crate::models::{
    Inference, InputEvent, InputSource, PromptDetection, PromptType, Session, SessionContext,
    SessionStats, SessionType, SessionUpdate,
};
use crate::monitor::SessionMonitor;
use crate::patterns::{PatternList, PatternStore, SortKey, TrackResult};
use crate::validation::{
    validate_confidence, validate_context_lines, validate_id, validate_max_results,
    validate_retention_days,
};

pub struct Sidekick {
    storage_dir: PathBuf,
    sessions: Mutex<BTreeMap<String, SessionMonitor>>,
    patterns: Mutex<PatternStore>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Sidekick {
    /// Open file-backed storage at `config.storage_dir`.
    pub fn open(config: &SidekickConfig) -> Result<Self> {
        let store = FsBlobStore::new(&config.storage_dir);
        store.init()?;
        let storage_dir = store.root().to_path_buf();
        Ok(Self::new(
            &storage_dir,
            Arc::new(store),
            config.auto_load_patterns,
        ))
    }

    /// `storage_dir` is the directory swept by [`cleanup`](Self::cleanup).
    pub fn new(storage_dir: &Path, blobs: Arc<dyn BlobStore>, auto_load: bool) -> Self {
        Self {
            storage_dir: storage_dir.to_path_buf(),
            sessions: Mutex::new(BTreeMap::new()),
            patterns: Mutex::new(PatternStore::new(blobs, auto_load)),
        }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    // ---------------------------------------------------------------------
    // Sessions
    // ---------------------------------------------------------------------

    pub fn start_monitor(
        &self,
        session_id: &str,
        session_type: &str,
        log_path: &Path,
        metadata: BTreeMap<String, String>,
    ) -> Result<Session> {
        validate_id(session_id)?;
        let session_type: SessionType = session_type.parse()?;

        let mut sessions = lock(&self.sessions);
        if sessions.contains_key(session_id) {
            return Err(SidekickError::AlreadyExists(format!(
                "Session {session_id} already exists"
            )));
        }

        let monitor =
            SessionMonitor::start(Session::new(session_id, session_type, log_path, metadata))?;
        let session = monitor.session().clone();
        sessions.insert(session_id.to_string(), monitor);
        Ok(session)
    }

    /// Read new output. File access failures stop the session and are returned.
    pub fn get_updates(&self, session_id: &str) -> Result<SessionUpdate> {
        let mut sessions = lock(&self.sessions);
        session_mut(&mut sessions, session_id)?.get_updates()
    }

    /// Stop and forget a session.
    pub fn stop_monitor(&self, session_id: &str, save_log: bool) -> Result<SessionStats> {
        let monitor = lock(&self.sessions)
            .remove(session_id)
            .ok_or_else(|| session_not_found(session_id))?;
        Ok(monitor.stop(save_log))
    }

    pub fn get_session(&self, session_id: &str) -> Result<Session> {
        let sessions = lock(&self.sessions);
        sessions
            .get(session_id)
            .map(|m| m.session().clone())
            .ok_or_else(|| session_not_found(session_id))
    }

    /// Sessions in id order.
    pub fn list_sessions(&self) -> Vec<Session> {
        lock(&self.sessions)
            .values()
            .map(|m| m.session().clone())
            .collect()
    }

    // ---------------------------------------------------------------------
    // Detection and inference
    // ---------------------------------------------------------------------

    /// Read new output for `session_id` and look for a prompt in it.
    pub fn detect_prompt(
        &self,
        session_id: &str,
        min_confidence: f64,
    ) -> Result<Option<PromptDetection>> {
        let mut sessions = lock(&self.sessions);
        let monitor = session_mut(&mut sessions, session_id)?;
        validate_confidence(min_confidence)?;

        let update = monitor.get_updates()?;
        let detector = PromptDetector::new(min_confidence);
        let detection = detector.detect(&update.new_text, update.byte_position);

        if let Some(detection) = &detection {
            tracing::info!(
                session_id = %session_id,
                prompt_type = %detection.prompt_type,
                confidence = detection.confidence,
                min_confidence = detector.min_confidence(),
                "Detected prompt"
            );
        }
        Ok(detection)
    }

    pub fn infer_inputs(
        &self,
        prompt_text: &str,
        prompt_type: &str,
        context: Option<&SessionContext>,
    ) -> Result<Inference> {
        let prompt_type: PromptType = prompt_type.parse()?;

        let patterns = lock(&self.patterns);
        let inference = SuggestionEngine::with_patterns(&patterns)
            .infer_inputs(prompt_text, prompt_type, context);

        tracing::info!(
            prompt_type = %prompt_type,
            suggestions = inference.suggestions.len(),
            "Inferred suggestions"
        );
        if !inference.warnings.is_empty() {
            tracing::warn!(warnings = inference.warnings.len(), "Prompt produced warnings");
        }
        Ok(inference)
    }

    // ---------------------------------------------------------------------
    // Learning
    // ---------------------------------------------------------------------

    pub fn track_event(
        &self,
        session_id: &str,
        prompt_text: &str,
        input_text: &str,
        success: bool,
        input_source: &str,
        response_time_ms: u64,
    ) -> Result<TrackResult> {
        validate_id(session_id)?;
        let input_source: InputSource = input_source.parse()?;

        Ok(lock(&self.patterns).track_input_event(
            session_id,
            prompt_text,
            input_text,
            success,
            input_source,
            response_time_ms,
        ))
    }

    pub fn get_patterns(
        &self,
        prompt_filter: Option<&str>,
        min_occurrences: u64,
        sort_by: &str,
    ) -> Result<PatternList> {
        let sort_by: SortKey = sort_by.parse()?;
        let list = lock(&self.patterns).get_patterns_formatted(
            prompt_filter,
            min_occurrences,
            sort_by,
        )?;

        tracing::info!(
            total = list.total_patterns,
            min_occurrences,
            sort_by = %sort_by,
            "Retrieved learned patterns"
        );
        Ok(list)
    }

    /// Persisted input events for `session_id`.
    pub fn session_history(&self, session_id: &str) -> Result<Vec<InputEvent>> {
        validate_id(session_id)?;
        lock(&self.patterns).load_session_history(session_id)
    }

    // ---------------------------------------------------------------------
    // History maintenance
    // ---------------------------------------------------------------------

    /// Regex search over one session's log, or every session in id order.
    pub fn search_history(
        &self,
        query: &str,
        session_id: Option<&str>,
        context_lines: usize,
        max_results: usize,
    ) -> Result<SearchResults> {
        validate_context_lines(context_lines)?;
        validate_max_results(max_results)?;
        let regex = compile_query(query)?;

        let targets: Vec<(String, PathBuf)> = {
            let sessions = lock(&self.sessions);
            match session_id {
                Some(id) => {
                    let monitor = sessions.get(id).ok_or_else(|| session_not_found(id))?;
                    vec![(id.to_string(), monitor.session().log_path.clone())]
                }
                None => sessions
                    .iter()
                    .map(|(id, m)| (id.clone(), m.session().log_path.clone()))
                    .collect(),
            }
        };

        let mut results = SearchResults::default();
        for (id, path) in targets {
            let matches = match search_log_file(&path, &regex, context_lines, max_results) {
                Ok(matches) => matches,
                Err(e) => {
                    tracing::warn!(session_id = %id, error = %e, "Failed to search session");
                    continue;
                }
            };

            results.matches.extend(matches.into_iter().map(|mut m| {
                m.session_id = Some(id.clone());
                m
            }));
            results.searched_sessions.push(id);

            if results.matches.len() >= max_results {
                results.matches.truncate(max_results);
                break;
            }
        }
        results.total_matches = results.matches.len();

        tracing::info!(
            sessions = results.searched_sessions.len(),
            matches = results.total_matches,
            "Searched session history"
        );
        Ok(results)
    }

    pub fn cleanup(&self, retention_days: u32, dry_run: bool) -> Result<CleanupReport> {
        self.cleanup_at(retention_days, dry_run, SystemTime::now())
    }

    /// [`cleanup`](Self::cleanup) against an explicit clock.
    pub fn cleanup_at(
        &self,
        retention_days: u32,
        dry_run: bool,
        now: SystemTime,
    ) -> Result<CleanupReport> {
        validate_retention_days(retention_days)?;
        let report = cleanup_old_files(&self.storage_dir, retention_days, dry_run, now)?;

        tracing::info!(
            deleted = report.total_deleted,
            bytes_freed = report.bytes_freed,
            retention_days,
            dry_run,
            "{}",
            if dry_run { "Cleanup dry run" } else { "Cleaned up old sessions" }
        );
        Ok(report)
    }
}

fn session_not_found(session_id: &str) -> SidekickError {
    SidekickError::NotFound(format!("Session {session_id} not found"))
}

fn session_mut<'a>(
    sessions: &'a mut BTreeMap<String, SessionMonitor>,
    session_id: &str,
) -> Result<&'a mut SessionMonitor> {
    sessions
        .get_mut(session_id)
        .ok_or_else(|| session_not_found(session_id))
}
