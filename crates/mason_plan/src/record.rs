//! Persisted dependency records and their on-disk store.
//!
//! A dependency record captures, for one source unit, the set of files its
//! last *successful* compilation was observed to read. Records are stored as
//! one JSON file per unit, named from the unit's path hash, and written via
//! the scoped atomic write in [`mason_common::write_atomic`] — a record on
//! disk is never partially written and never describes a failed compile.
//!
//! Records are precious: they survive `clean` and are only removed by an
//! explicit full reset.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use mason_common::write_atomic;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::unit::SourceUnit;

/// File extension for dependency records.
const RECORD_EXT: &str = "json";

/// The files one source unit's last successful compilation depended on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Path of the owning source unit.
    pub unit: PathBuf,
    /// Dependency paths, sorted and deduplicated. Includes the source itself
    /// as reported by the compiler; order carries no meaning.
    pub deps: Vec<PathBuf>,
    /// When this record was generated.
    pub generated_at: SystemTime,
    /// Mason version that wrote the record. Records from another version
    /// are ignored on load, forcing recompilation.
    pub mason_version: String,
}

impl DependencyRecord {
    /// Creates a record for `unit` with the given dependency list.
    ///
    /// The list is sorted and deduplicated; the generation timestamp is now.
    pub fn new(unit: &SourceUnit, mut deps: Vec<PathBuf>, mason_version: &str) -> Self {
        deps.sort();
        deps.dedup();
        Self {
            unit: unit.path.clone(),
            deps,
            generated_at: SystemTime::now(),
            mason_version: mason_version.to_string(),
        }
    }
}

/// On-disk store of dependency records, one file per source unit.
///
/// The store directory is created lazily on first write; planning against a
/// project that has never been built touches nothing on disk.
#[derive(Debug)]
pub struct RecordStore {
    /// Directory holding the record files.
    record_dir: PathBuf,
    /// Current mason version, checked against loaded records.
    version: String,
}

impl RecordStore {
    /// Creates a store rooted at `record_dir` for the given mason version.
    pub fn new(record_dir: &Path, version: &str) -> Self {
        Self {
            record_dir: record_dir.to_path_buf(),
            version: version.to_string(),
        }
    }

    /// Returns the path of the record file for a unit.
    pub fn record_path(&self, unit: &SourceUnit) -> PathBuf {
        self.record_dir
            .join(format!("{}.{}", unit.record_key, RECORD_EXT))
    }

    /// Loads the record for a unit.
    ///
    /// Fail-safe: returns `None` if the record does not exist, cannot be
    /// parsed, or was written by a different mason version. `None` means
    /// "recompile", never "error".
    pub fn load(&self, unit: &SourceUnit) -> Option<DependencyRecord> {
        let content = std::fs::read_to_string(self.record_path(unit)).ok()?;
        let record: DependencyRecord = serde_json::from_str(&content).ok()?;
        if record.mason_version != self.version {
            return None;
        }
        Some(record)
    }

    /// Persists a unit's record atomically.
    ///
    /// Must only be called after the unit's compilation succeeded: the write
    /// goes to a temporary sibling first and is renamed into place, so a
    /// crash here leaves the previous record intact.
    pub fn store(&self, unit: &SourceUnit, record: &DependencyRecord) -> Result<(), PlanError> {
        std::fs::create_dir_all(&self.record_dir).map_err(|e| PlanError::Io {
            path: self.record_dir.clone(),
            source: e,
        })?;
        let json =
            serde_json::to_string_pretty(record).map_err(|e| PlanError::Serialization {
                reason: e.to_string(),
            })?;
        let path = self.record_path(unit);
        write_atomic(&path, json.as_bytes()).map_err(|e| PlanError::Io { path, source: e })
    }
}
