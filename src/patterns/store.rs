use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Result, SidekickError};
use crate::fs::storage::{history_key, BlobStore, PATTERNS_KEY};
use crate::models::{pattern_id, InputEvent, InputSource, Pattern, REDACTED};
use crate::security::is_password_prompt;

/// Characters of prompt text included in log lines.
const LOG_PROMPT_CHARS: usize = 50;

/// Outcome of [`PatternStore::track_input_event`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResult {
    pub event_id: String,
    pub recorded: bool,
    pub pattern_updated: bool,
}

#[derive(Serialize, Deserialize)]
struct PatternsBlob {
    patterns: Vec<Pattern>,
}

#[derive(Serialize, Deserialize)]
struct HistoryBlob {
    session_id: String,
    events: Vec<InputEvent>,
}

/// Learned prompt/response statistics plus per-session event logs.
///
/// Every pattern mutation is written through to the blob store before the
/// call returns. Persistence failures are logged and never surface to the
/// caller; the in-memory state stays authoritative for the process.
pub struct PatternStore {
    blobs: Arc<dyn BlobStore>,
    patterns: BTreeMap<String, Pattern>,
    events: HashMap<String, Vec<InputEvent>>,
}

impl std::fmt::Debug for PatternStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternStore")
            .field("patterns", &self.patterns.len())
            .field("sessions", &self.events.len())
            .finish()
    }
}

impl PatternStore {
    /// Create a store over `blobs`, loading persisted patterns if `auto_load`.
    pub fn new(blobs: Arc<dyn BlobStore>, auto_load: bool) -> Self {
        let mut store = Self {
            blobs,
            patterns: BTreeMap::new(),
            events: HashMap::new(),
        };
        if auto_load {
            store.load();
        }
        store
    }

    /// Record one observed answer and learn from it.
    ///
    /// Inputs to password-like prompts are stored as `[REDACTED]` and never
    /// reach the pattern table.
    pub fn track_input_event(
        &mut self,
        session_id: &str,
        prompt_text: &str,
        input_text: &str,
        success: bool,
        input_source: InputSource,
        response_time_ms: u64,
    ) -> TrackResult {
        let event_id = Uuid::new_v4().to_string();
        let is_password = is_password_prompt(prompt_text);
        if is_password {
            tracing::info!(session_id = %session_id, "Password prompt detected, input redacted");
        }

        let event = InputEvent {
            event_id: event_id.clone(),
            session_id: session_id.to_string(),
            timestamp: Utc::now(),
            prompt_text: prompt_text.to_string(),
            input_text: if is_password {
                REDACTED.to_string()
            } else {
                input_text.to_string()
            },
            success,
            input_source,
            response_time_ms,
        };
        if !self.events.contains_key(session_id) {
            let earlier = self.load_session_history(session_id).unwrap_or_else(|e| {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Ignoring unreadable session history"
                );
                Vec::new()
            });
            self.events.insert(session_id.to_string(), earlier);
        }
        self.events
            .entry(session_id.to_string())
            .or_default()
            .push(event);
        self.save_session_history(session_id);

        let pattern_updated = if is_password {
            false
        } else {
            self.update_pattern(prompt_text, input_text, success);
            true
        };

        tracing::info!(
            event_id = %event_id,
            session_id = %session_id,
            prompt = %truncate(prompt_text, LOG_PROMPT_CHARS),
            success,
            pattern_updated,
            "Tracked input event"
        );

        TrackResult {
            event_id,
            recorded: true,
            pattern_updated,
        }
    }

    fn update_pattern(&mut self, prompt_text: &str, input_text: &str, success: bool) {
        let id = pattern_id(prompt_text);
        let pattern = self.patterns.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(
                pattern_id = %id,
                prompt = %truncate(prompt_text, LOG_PROMPT_CHARS),
                "Created new pattern"
            );
            Pattern::new(prompt_text)
        });

        pattern.record(input_text, success);
        tracing::debug!(
            pattern_id = %id,
            total_occurrences = pattern.total_occurrences,
            "Updated pattern"
        );

        self.save();
    }

    /// Events tracked for `session_id` by this process, oldest first.
    pub fn session_events(&self, session_id: &str) -> &[InputEvent] {
        self.events
            .get(session_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Events persisted for `session_id`, including earlier processes.
    pub fn load_session_history(&self, session_id: &str) -> Result<Vec<InputEvent>> {
        let Some(bytes) = self.blobs.get(&history_key(session_id))? else {
            return Ok(Vec::new());
        };
        let blob: HistoryBlob = serde_json::from_slice(&bytes).map_err(|e| {
            SidekickError::StorageCorrupt(format!("history for session {session_id}: {e}"))
        })?;
        Ok(blob.events)
    }

    fn save_session_history(&self, session_id: &str) {
        let blob = HistoryBlob {
            session_id: session_id.to_string(),
            events: self.session_events(session_id).to_vec(),
        };
        let result = serde_json::to_vec_pretty(&blob)
            .map_err(SidekickError::from)
            .and_then(|bytes| self.blobs.put(&history_key(session_id), &bytes));
        if let Err(e) = result {
            tracing::error!(session_id = %session_id, error = %e, "Failed to save session history");
        }
    }

    /// All patterns in `pattern_id` order.
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.values()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Lookup using the same normalization as tracking.
    pub fn get_pattern_by_prompt(&self, prompt_text: &str) -> Option<&Pattern> {
        self.patterns.get(&pattern_id(prompt_text))
    }

    /// Persist the whole pattern table. Returns `false` on failure.
    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => {
                tracing::debug!(patterns = self.patterns.len(), "Saved patterns to storage");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save patterns to storage");
                false
            }
        }
    }

    fn try_save(&self) -> Result<()> {
        let blob = PatternsBlob {
            patterns: self.patterns.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&blob)?;
        self.blobs.put(PATTERNS_KEY, &bytes)
    }

    /// Merge persisted patterns into memory, replacing entries by id.
    ///
    /// Returns the number of patterns read. Missing or unreadable storage is
    /// logged and counts as zero.
    pub fn load(&mut self) -> usize {
        match self.try_load() {
            Ok(0) => {
                tracing::debug!("No patterns found in storage");
                0
            }
            Ok(count) => {
                tracing::info!(count, "Loaded patterns from storage");
                count
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load patterns from storage");
                0
            }
        }
    }

    fn try_load(&mut self) -> Result<usize> {
        let Some(bytes) = self.blobs.get(PATTERNS_KEY)? else {
            return Ok(0);
        };
        let blob: PatternsBlob = serde_json::from_slice(&bytes)
            .map_err(|e| SidekickError::StorageCorrupt(format!("{PATTERNS_KEY}: {e}")))?;

        let count = blob.patterns.len();
        for pattern in blob.patterns {
            self.patterns.insert(pattern.pattern_id.clone(), pattern);
        }
        Ok(count)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
