//! Shared foundational types for the mason build orchestrator.
//!
//! This crate provides content hashing (used for change detection and for
//! deterministic naming of on-disk metadata) and the filesystem write
//! discipline the rest of the tool relies on (scoped atomic writes,
//! artifact timestamp refresh).

#![warn(missing_docs)]

pub mod fswrite;
pub mod hash;

pub use fswrite::{touch_now, write_atomic};
pub use hash::ContentHash;
