//! The external linker collaborator.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::compiler::diagnostic_text;
use crate::error::ToolchainError;

/// Invokes the compiler driver to link objects into the final executable.
///
/// Links to a temporary sibling of the output path and renames on success,
/// so a failed or interrupted link never leaves a half-written executable
/// that a later plan would mistake for a valid artifact.
#[derive(Debug, Clone)]
pub struct Linker {
    /// Linker driver executable (the C compiler driver).
    cc: String,
    /// Flags appended after the object list.
    ldflags: Vec<String>,
}

impl Linker {
    /// Creates a linker collaborator.
    pub fn new(cc: &str, ldflags: &[String]) -> Self {
        Self {
            cc: cc.to_string(),
            ldflags: ldflags.to_vec(),
        }
    }

    /// Links `objects` into `output`.
    ///
    /// Link failures are fatal and propagated; there are no retries.
    pub fn link(&self, objects: &[PathBuf], output: &Path) -> Result<(), ToolchainError> {
        let file_name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        let tmp_output = output.with_file_name(format!(".{file_name}.tmp"));

        let mut cmd = Command::new(&self.cc);
        cmd.args(objects);
        cmd.arg("-o").arg(&tmp_output);
        cmd.args(&self.ldflags);

        let result = cmd.output().map_err(|e| ToolchainError::Launch {
            program: self.cc.clone(),
            source: e,
        });

        match result {
            Ok(out) if out.status.success() => {
                std::fs::rename(&tmp_output, output).map_err(|e| ToolchainError::Io {
                    path: output.to_path_buf(),
                    source: e,
                })
            }
            Ok(out) => {
                let _ = std::fs::remove_file(&tmp_output);
                Err(ToolchainError::Link {
                    output: output.to_path_buf(),
                    diagnostic: diagnostic_text(&out.stderr, &out.stdout),
                })
            }
            Err(e) => {
                let _ = std::fs::remove_file(&tmp_output);
                Err(e)
            }
        }
    }
}
