use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::SidekickError;
use crate::validation::list_values;

/// How the monitored log is produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    /// Output of an interactive SSH session
    Ssh,
    /// Output captured by `script(1)` or a similar recorder
    Script,
    /// Any other growing text file
    File,
}

impl SessionType {
    pub fn all() -> &'static [SessionType] {
        &[SessionType::Ssh, SessionType::Script, SessionType::File]
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionType::Ssh => write!(f, "ssh"),
            SessionType::Script => write!(f, "script"),
            SessionType::File => write!(f, "file"),
        }
    }
}

impl std::str::FromStr for SessionType {
    type Err = SidekickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ssh" => Ok(SessionType::Ssh),
            "script" => Ok(SessionType::Script),
            "file" => Ok(SessionType::File),
            _ => Err(SidekickError::invalid(format!(
                "Invalid session_type: {s}. Must be one of: {}",
                list_values(SessionType::all())
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    /// Terminal. Reached by an explicit stop or a failed log read.
    Stopped,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Active => write!(f, "active"),
            SessionState::Stopped => write!(f, "stopped"),
        }
    }
}

/// A monitored terminal session.
///
/// `byte_position` is only ever advanced by the tailer; callers must treat
/// the value returned from a read as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "session_id")]
    pub id: String,
    pub session_type: SessionType,
    pub log_path: PathBuf,
    pub byte_position: u64,
    pub start_time: DateTime<Utc>,
    pub state: SessionState,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        session_type: SessionType,
        log_path: impl Into<PathBuf>,
        metadata: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: id.into(),
            session_type,
            log_path: log_path.into(),
            byte_position: 0,
            start_time: Utc::now(),
            state: SessionState::Active,
            metadata,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_terminal()
    }
}

/// Summary returned when a session is stopped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: String,
    pub state: SessionState,
    pub total_bytes_processed: u64,
    pub session_duration_seconds: f64,
}

/// Result of one incremental read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub session_id: String,
    pub new_text: String,
    pub byte_position: u64,
    pub has_more: bool,
}
