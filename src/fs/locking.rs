//! Advisory-locked blob reads and writes.
//!
//! Several sidekick processes may share one storage directory, so every blob
//! access goes through `fs2` locks. Advisory locks are cooperative: only
//! readers and writers using these functions are serialized.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Result, SidekickError};

/// Owner read/write only.
pub const FILE_MODE: u32 = 0o600;

/// Read a whole file under a shared lock.
pub fn locked_read(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| SidekickError::from_file_io(e, path))?;
    file.lock_shared()?;
    let mut content = Vec::new();
    BufReader::new(&file).read_to_end(&mut content)?;
    Ok(content)
}

/// Replace a file's contents under an exclusive lock.
///
/// The sequence is: open → lock → truncate → write → flush. Truncating only
/// after the lock is held keeps concurrent readers from observing an empty
/// file. The file is left owner-only after every write, including files that
/// existed with wider permissions.
pub fn locked_write(path: &Path, content: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    #[allow(clippy::suspicious_open_options)]
    let file = options
        .open(path)
        .map_err(|e| SidekickError::from_file_io(e, path))?;
    file.lock_exclusive()?;
    file.set_len(0)?;
    let mut writer = BufWriter::new(&file);
    writer.write_all(content)?;
    writer.flush()?;
    drop(writer);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(FILE_MODE))?;
    }
    Ok(())
}
