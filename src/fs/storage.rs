//! Key-value blob storage behind the pattern store.
//!
//! Keys are relative slash-separated paths (`patterns.json`,
//! `history/<session>.json`). The filesystem implementation maps them onto a
//! root directory created owner-only; the in-memory implementation backs
//! tests and callers that opt out of durability.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, SidekickError};
use crate::fs::locking::{locked_read, locked_write};

/// Global blob holding every learned pattern.
pub const PATTERNS_KEY: &str = "patterns.json";

/// Directory holding one event-history blob per session.
pub const HISTORY_DIR: &str = "history";

/// Owner-only directory mode.
pub const DIR_MODE: u32 = 0o700;

pub fn history_key(session_id: &str) -> String {
    format!("{HISTORY_DIR}/{session_id}.json")
}

/// Storage port used by [`crate::patterns::PatternStore`].
pub trait BlobStore: Send + Sync {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// Blobs stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root and history directories with owner-only permissions.
    pub fn init(&self) -> Result<()> {
        create_private_dir(&self.root)?;
        create_private_dir(&self.root.join(HISTORY_DIR))?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(SidekickError::invalid(format!("Invalid blob key: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            create_private_dir(parent)?;
        }
        locked_write(&path, bytes)
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match locked_read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(SidekickError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn create_private_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path)?;
    Ok(())
}

/// Process-local blob store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = blobs.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let mut blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let blobs = self.blobs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(blobs.get(key).cloned())
    }
}
