//! External toolchain collaborators: the C compiler and linker.
//!
//! mason never inspects source text itself. Dependency knowledge comes from
//! the compiler's own dependency emission (`-MMD -MF`), parsed from the
//! Make-style depfile it writes. Both collaborators follow the same
//! discipline as metadata writes: outputs go to a temporary path and are
//! renamed into place only on success, so a failed invocation leaves every
//! artifact exactly as it was.

#![warn(missing_docs)]

pub mod compiler;
pub mod depfile;
pub mod error;
pub mod linker;

pub use compiler::Compiler;
pub use error::ToolchainError;
pub use linker::Linker;
