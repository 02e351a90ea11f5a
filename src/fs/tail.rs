//! Incremental reads over a growing log file.
//!
//! The tailer is stateless: callers own the byte offset and must store the
//! offset returned by [`read_new`] rather than computing one from the text,
//! since lossy decoding and newline translation change the text length.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Result, SidekickError};

/// Text appended since the last read and the offset to resume from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailRead {
    pub text: String,
    pub position: u64,
}

/// Read from `from_position` to end of file.
///
/// Invalid UTF-8 is replaced with U+FFFD and `\r\n` / lone `\r` become `\n`.
/// Seeking past the end yields empty text with the position unchanged.
pub fn read_new(path: &Path, from_position: u64) -> Result<TailRead> {
    let mut file = File::open(path).map_err(|e| SidekickError::from_file_io(e, path))?;
    file.seek(SeekFrom::Start(from_position))?;

    let mut bytes = Vec::new();
    let read = file
        .read_to_end(&mut bytes)
        .map_err(|e| SidekickError::from_file_io(e, path))?;

    Ok(TailRead {
        text: decode(&bytes),
        position: from_position + read as u64,
    })
}

/// Current size of the file in bytes.
pub fn file_size(path: &Path) -> Result<u64> {
    let metadata = std::fs::metadata(path).map_err(|e| SidekickError::from_file_io(e, path))?;
    Ok(metadata.len())
}

/// Best-effort liveness hint: the file already holds bytes past `position`.
pub fn has_more(path: &Path, position: u64) -> Result<bool> {
    Ok(position < file_size(path)?)
}

fn decode(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.into_owned()
    }
}
