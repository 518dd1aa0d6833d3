//! Disk I/O helpers: read a whole file, write a whole file, seed missing files.
//!
//! Writes go through a temp file and a rename, which is close to atomic on
//! most platforms. On FAT32 or network shares there are no hard guarantees.

use crate::error::{Error, Result};
use crate::serializer::Serializer;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Read and decode every record in the file at `path`.
///
/// A missing file is an error; [`ensure_file`] creates both files at startup.
pub fn read_data<T, S>(path: &Path, serializer: &S) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: Serializer,
{
    let bytes = std::fs::read(path)
        .map_err(|e| Error::Io(format!("reading {}: {e}", path.display())))?;
    let items = serializer
        .deserialize(&bytes)
        .map_err(|e| match e {
            Error::Deserialize(msg) => Error::Deserialize(format!("{}: {msg}", path.display())),
            other => other,
        })?;
    debug!(path = %path.display(), records = items.len(), "read data file");
    Ok(items)
}

/// Encode `items` and replace the file at `path` with the result.
pub fn write_data<T, S>(path: &Path, items: &[T], serializer: &S) -> Result<()>
where
    T: Serialize,
    S: Serializer,
{
    let bytes = serializer.serialize(items)?;
    atomic_write(path, &bytes)?;
    debug!(path = %path.display(), records = items.len(), "wrote data file");
    Ok(())
}

/// Create `path` holding an empty JSON array if nothing is there yet.
/// Returns `true` when the file was created.
pub fn ensure_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    atomic_write(path, b"[]")?;
    debug!(path = %path.display(), "created empty data file");
    Ok(true)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`. This avoids
/// leaving a half-written file if the process crashes mid-write.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes).map_err(|e| Error::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::Io(e.to_string()))?;
    Ok(())
}
