//! Incremental build planning.
//!
//! This crate owns the dependency-driven rebuild semantics at the heart of
//! mason: which source units must be recompiled, and whether the final link
//! must rerun. It knows nothing about how compilation happens — the
//! toolchain is an external collaborator — only about units, their persisted
//! dependency records, and artifact timestamps.
//!
//! All record reads are fail-safe: a missing, corrupt, or version-mismatched
//! record is a cache miss that forces recompilation, never an error.

#![warn(missing_docs)]

pub mod error;
pub mod planner;
pub mod record;
pub mod unit;

pub use error::PlanError;
pub use planner::{BuildPlan, PlanWarning, Planner, StaleReason};
pub use record::{DependencyRecord, RecordStore};
pub use unit::SourceUnit;
