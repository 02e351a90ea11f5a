//! Retention cleanup for the storage directory.

use glob::glob;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::{Result, SidekickError};
use crate::fs::storage::PATTERNS_KEY;

pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupReport {
    /// File names (not full paths) that were, or in a dry run would be, removed
    pub deleted_sessions: Vec<String>,
    pub total_deleted: usize,
    pub bytes_freed: u64,
    pub dry_run: bool,
}

/// Remove every file under `root` older than `retention_days`.
///
/// Age must be strictly greater than the retention window, so a file exactly
/// `retention_days` old survives and one a fraction of a second older does not. The
/// global pattern blob is never touched. `now` is injectable for tests.
pub fn cleanup_old_files(
    root: &Path,
    retention_days: u32,
    dry_run: bool,
    now: SystemTime,
) -> Result<CleanupReport> {
    let mut report = CleanupReport {
        dry_run,
        ..CleanupReport::default()
    };

    if !root.is_dir() {
        return Ok(report);
    }

    let max_age = Duration::from_secs(u64::from(retention_days) * SECONDS_PER_DAY);
    let patterns_path = root.join(PATTERNS_KEY);
    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&root.to_string_lossy())
    );

    let mut candidates: Vec<_> = glob(&pattern)
        .map_err(|e| SidekickError::invalid(format!("Invalid storage path: {e}")))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && *path != patterns_path)
        .collect();
    candidates.sort();

    for path in candidates {
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unreadable file during cleanup"
                );
                continue;
            }
        };

        let Some(age) = metadata
            .modified()
            .ok()
            .and_then(|mtime| now.duration_since(mtime).ok())
        else {
            continue;
        };
        if age <= max_age {
            continue;
        }

        if !dry_run {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete expired file");
                continue;
            }
        }

        tracing::debug!(path = %path.display(), age_secs = age.as_secs(), dry_run, "Expired file");
        report.bytes_freed += metadata.len();
        report.deleted_sessions.push(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        );
    }

    report.total_deleted = report.deleted_sessions.len();
    Ok(report)
}
