//! Error types for compiler and linker invocations.

use std::path::PathBuf;

/// Errors from invoking the external compiler or linker.
///
/// Diagnostics from the tools are surfaced verbatim; mason never rewrites
/// or retries them. A compile error aborts the invocation (fail-fast); a
/// link error is always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// The tool binary could not be spawned at all.
    #[error("failed to run '{program}': {source}")]
    Launch {
        /// The program name or path that was invoked.
        program: String,
        /// The underlying spawn error.
        source: std::io::Error,
    },

    /// The compiler exited with a failure status.
    #[error("compilation of {unit} failed:\n{diagnostic}")]
    Compile {
        /// The source unit being compiled.
        unit: PathBuf,
        /// The compiler's diagnostic output, verbatim.
        diagnostic: String,
    },

    /// The linker exited with a failure status.
    #[error("linking {output} failed:\n{diagnostic}")]
    Link {
        /// The executable being linked.
        output: PathBuf,
        /// The linker's diagnostic output, verbatim.
        diagnostic: String,
    },

    /// The compiler reported success but its dependency output was missing
    /// or unusable.
    #[error("unusable dependency output at {path}: {reason}")]
    Depfile {
        /// The depfile path.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// An I/O error occurred while moving tool outputs into place.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
