//! Parsing and validation of `mason.toml` project configuration files.
//!
//! This crate reads the project configuration file into a strongly-typed
//! [`ProjectConfig`] and resolves it against a project directory into the
//! concrete filesystem layout ([`ResolvedLayout`]) the build pipeline works
//! with. Configuration is always passed explicitly into the planner and
//! toolchain; there is no ambient global state.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use resolve::ResolvedLayout;
pub use types::*;
