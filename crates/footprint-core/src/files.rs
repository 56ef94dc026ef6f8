//! Clobber-checked file output
//!
//! Every operation refuses to replace an existing destination unless the
//! caller passes `clobber = true`.

use crate::error::FileError;
use serde::Serialize;
use std::fs;
use std::path::Path;

fn check_clobber(path: &Path, clobber: bool) -> Result<(), FileError> {
    if !clobber && path.exists() {
        return Err(FileError::Clobber {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Write text to `path`
pub fn write_text(path: impl AsRef<Path>, text: &str, clobber: bool) -> Result<(), FileError> {
    let path = path.as_ref();
    check_clobber(path, clobber)?;
    fs::write(path, text).map_err(|e| FileError::io_error(path, e))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote file");
    Ok(())
}

/// Write `value` to `path` as pretty-printed JSON
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T, clobber: bool) -> Result<(), FileError> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(value).map_err(|source| FileError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    write_text(path, &text, clobber)
}

/// Move `source` to `destination`
///
/// Falls back to copy and remove when a plain rename is not possible,
/// e.g. across filesystems.
pub fn move_file(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    clobber: bool,
) -> Result<(), FileError> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    check_clobber(destination, clobber)?;

    if fs::rename(source, destination).is_err() {
        fs::copy(source, destination).map_err(|e| FileError::io_error(source, e))?;
        fs::remove_file(source).map_err(|e| FileError::io_error(source, e))?;
    }
    tracing::debug!(from = %source.display(), to = %destination.display(), "moved file");
    Ok(())
}
