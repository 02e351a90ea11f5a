//! Tailing state for a single monitored session.

use std::fs::File;
use std::io;
use std::time::Instant;

use crate::error::{Result, SidekickError};
use crate::fs::tail::{self, TailRead};
use crate::models::{Session, SessionStats, SessionUpdate};

/// Owns one [`Session`] and advances its byte position.
#[derive(Debug)]
pub struct SessionMonitor {
    session: Session,
    started: Instant,
}

impl SessionMonitor {
    /// Begin monitoring after checking the log can be opened for reading.
    pub fn start(session: Session) -> Result<Self> {
        File::open(&session.log_path)
            .map_err(|e| SidekickError::from_file_io(e, &session.log_path))?;

        tracing::info!(
            session_id = %session.id,
            session_type = %session.session_type,
            log_path = %session.log_path.display(),
            "Started monitoring session"
        );

        Ok(Self {
            session,
            started: Instant::now(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read everything appended since the previous call.
    ///
    /// A missing or unreadable log stops the session before the error is
    /// returned.
    pub fn get_updates(&mut self) -> Result<SessionUpdate> {
        let read = match tail::read_new(&self.session.log_path, self.session.byte_position) {
            Ok(read) => read,
            Err(e) => {
                if e.is_file_access_failure() {
                    tracing::warn!(
                        session_id = %self.session.id,
                        error = %e,
                        "Log unavailable, stopping session"
                    );
                    self.session.stop();
                }
                return Err(e);
            }
        };

        let has_more = tail::has_more(&self.session.log_path, read.position);
        Ok(self.advance(read, has_more))
    }

    /// Commit a successful read. The chunk is already consumed, so a failed
    /// size check only loses the `has_more` hint.
    fn advance(&mut self, read: TailRead, has_more: Result<bool>) -> SessionUpdate {
        let has_more = has_more.unwrap_or_else(|e| {
            tracing::debug!(
                session_id = %self.session.id,
                error = %e,
                "Could not check for more output"
            );
            false
        });

        tracing::debug!(
            session_id = %self.session.id,
            from = self.session.byte_position,
            to = read.position,
            "Read session update"
        );
        self.session.byte_position = read.position;

        SessionUpdate {
            session_id: self.session.id.clone(),
            new_text: read.text,
            byte_position: read.position,
            has_more,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Stop the session, deleting its log unless `save_log`.
    ///
    /// Failure to delete the log is logged and otherwise ignored.
    pub fn stop(mut self, save_log: bool) -> SessionStats {
        self.session.stop();
        let stats = SessionStats {
            session_id: self.session.id.clone(),
            state: self.session.state,
            total_bytes_processed: self.session.byte_position,
            session_duration_seconds: self.duration_seconds(),
        };

        if !save_log {
            match std::fs::remove_file(&self.session.log_path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        session_id = %self.session.id,
                        error = %e,
                        "Failed to remove session log"
                    );
                }
            }
        }

        tracing::info!(
            session_id = %stats.session_id,
            bytes = stats.total_bytes_processed,
            "Stopped session"
        );
        stats
    }
}
