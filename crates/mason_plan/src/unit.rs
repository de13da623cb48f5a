//! Source units: the compilable inputs of a build.

use mason_common::ContentHash;
use std::path::{Path, PathBuf};

/// One compilable input file, with its derived artifact identities.
///
/// A unit is immutable during one build invocation. Its object path and
/// record key are both derived deterministically from the source path, so a
/// unit can always be matched to its artifacts without a separate index.
/// The object file name carries a short path-hash suffix because two units
/// in different directories may share a file stem (`src/a.c`, `src/sub/a.c`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path of the source file.
    pub path: PathBuf,
    /// Path of the object file this unit compiles to.
    pub object: PathBuf,
    /// Key naming this unit's dependency record (32 hex chars).
    pub record_key: String,
}

impl SourceUnit {
    /// Creates a unit for `path`, placing its object under `obj_dir`.
    pub fn new(path: PathBuf, obj_dir: &Path) -> Self {
        let hash = ContentHash::from_path_name(&path);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unit".to_string());
        let object = obj_dir.join(format!("{stem}.{}.o", hash.short_hex()));
        Self {
            path,
            object,
            record_key: hash.to_string(),
        }
    }
}
