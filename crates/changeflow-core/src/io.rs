use crate::error::{ChangeflowError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting task files mid-rewrite.
/// Permission failures surface as `PermissionDenied` rather than generic I/O.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let map = |e: std::io::Error| ChangeflowError::from_io(e, path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(map)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(map)?;
    tmp.write_all(data).map_err(map)?;
    tmp.persist(path).map_err(|e| map(e.error))?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| ChangeflowError::from_io(e, path))?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}
