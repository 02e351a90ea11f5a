//! Shared test helpers for sidekick integration tests

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use sidekick::fs::storage::FsBlobStore;
use sidekick::Sidekick;

/// Temporary storage directory plus a place for session logs.
pub struct TestEnv {
    pub temp: TempDir,
    pub sidekick: Sidekick,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let sidekick = open_sidekick(&storage_dir(&temp));
        Self { temp, sidekick }
    }

    pub fn storage_dir(&self) -> PathBuf {
        storage_dir(&self.temp)
    }

    /// Create a log file with initial content.
    pub fn log(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        fs::write(&path, content).expect("Failed to write log file");
        path
    }

    /// Reopen storage as a fresh process would.
    pub fn restart(&self) -> Sidekick {
        open_sidekick(&self.storage_dir())
    }
}

fn storage_dir(temp: &TempDir) -> PathBuf {
    temp.path().join("storage")
}

fn open_sidekick(storage: &Path) -> Sidekick {
    let blobs = FsBlobStore::new(storage);
    blobs.init().expect("Failed to init storage");
    Sidekick::new(storage, Arc::new(blobs), true)
}

/// Append text to a log as a terminal recorder would.
pub fn append(path: &Path, content: &str) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .expect("Failed to open log for append");
    file.write_all(content.as_bytes())
        .expect("Failed to append to log");
}
