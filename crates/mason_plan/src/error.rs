//! Error types for build planning and record persistence.

use std::path::PathBuf;

/// Errors that can occur while planning a build or persisting records.
///
/// A missing dependency record is *not* an error (it is the expected cold
/// start) and never appears here; fail-safe reads turn it into staleness.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The planner was given an empty unit set.
    #[error("nothing to build: the source unit set is empty")]
    EmptyUnitSet,

    /// A source unit's path does not exist on the filesystem.
    #[error("source file not found: {path}")]
    MissingSource {
        /// The missing source path.
        path: PathBuf,
    },

    /// An I/O error occurred while inspecting artifacts or writing records.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A dependency record could not be serialized.
    #[error("failed to serialize dependency record: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
