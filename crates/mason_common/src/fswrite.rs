//! Scoped atomic writes and artifact timestamp refresh.
//!
//! Persisted metadata must never be observable in a half-written state: a
//! crash mid-write must leave either the old file or the new file, nothing
//! in between. `write_atomic` implements the scoped-write discipline used
//! throughout mason: write to a temporary sibling, flush and fsync, then
//! rename into place. Readers only ever open final names, so a leftover
//! temporary from a failed attempt is inert.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

/// Writes `data` to `path` atomically.
///
/// The data is first written to `.<file_name>.tmp` in the same directory
/// (same filesystem, so the final rename cannot cross a mount boundary),
/// fsynced, and then renamed over `path`. On any failure the temporary file
/// is removed and `path` is left untouched.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let tmp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        std::fs::rename(&tmp, path)
    })();

    if result.is_err() {
        // Best effort: the temporary is harmless if this fails too.
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

/// Refreshes a file's modification time to now.
///
/// Called on an object file after its dependency record has been written, so
/// the object can never appear older than metadata produced in the same
/// build step (which would make it look permanently stale under clock skew).
pub fn touch_now(path: &Path) -> io::Result<()> {
    let file = File::options().write(true).open(path)?;
    file.set_modified(SystemTime::now())
}
