//! The external compiler collaborator.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::depfile;
use crate::error::ToolchainError;

/// Invokes the external C compiler for one source unit.
///
/// The object and the depfile are both written to temporary siblings of the
/// final object path; the object is renamed into place only after the
/// compiler reports success. A failed compilation therefore leaves the
/// previous object (if any) bit-identical, and the caller's dependency
/// record is never updated for a failed attempt.
#[derive(Debug, Clone)]
pub struct Compiler {
    /// Compiler driver executable.
    cc: String,
    /// Flags passed to every invocation.
    cflags: Vec<String>,
    /// Include search directories, passed as `-I` flags.
    include_dirs: Vec<PathBuf>,
}

impl Compiler {
    /// Creates a compiler collaborator.
    pub fn new(cc: &str, cflags: &[String], include_dirs: &[PathBuf]) -> Self {
        Self {
            cc: cc.to_string(),
            cflags: cflags.to_vec(),
            include_dirs: include_dirs.to_vec(),
        }
    }

    /// Compiles `source` to `object`, returning the dependency paths the
    /// compiler observed.
    ///
    /// The returned list is what the caller persists as the unit's
    /// dependency record — strictly after this function returns `Ok`.
    pub fn compile(&self, source: &Path, object: &Path) -> Result<Vec<PathBuf>, ToolchainError> {
        let tmp_object = object.with_extension("o.tmp");
        let tmp_depfile = object.with_extension("d.tmp");

        let result = self.run(source, &tmp_object, &tmp_depfile);

        // The raw depfile is consumed into the record; neither temporary
        // survives past this invocation on any path.
        let _ = std::fs::remove_file(&tmp_depfile);
        match result {
            Ok(deps) => {
                std::fs::rename(&tmp_object, object).map_err(|e| ToolchainError::Io {
                    path: object.to_path_buf(),
                    source: e,
                })?;
                Ok(deps)
            }
            Err(e) => {
                let _ = std::fs::remove_file(&tmp_object);
                Err(e)
            }
        }
    }

    /// Runs the compiler, leaving outputs at the temporary paths.
    fn run(
        &self,
        source: &Path,
        tmp_object: &Path,
        tmp_depfile: &Path,
    ) -> Result<Vec<PathBuf>, ToolchainError> {
        let mut cmd = Command::new(&self.cc);
        cmd.args(&self.cflags);
        for dir in &self.include_dirs {
            cmd.arg("-I").arg(dir);
        }
        cmd.arg("-MMD")
            .arg("-MF")
            .arg(tmp_depfile)
            .arg("-c")
            .arg(source)
            .arg("-o")
            .arg(tmp_object);

        let output = cmd.output().map_err(|e| ToolchainError::Launch {
            program: self.cc.clone(),
            source: e,
        })?;

        if !output.status.success() {
            return Err(ToolchainError::Compile {
                unit: source.to_path_buf(),
                diagnostic: diagnostic_text(&output.stderr, &output.stdout),
            });
        }

        let text =
            std::fs::read_to_string(tmp_depfile).map_err(|e| ToolchainError::Depfile {
                path: tmp_depfile.to_path_buf(),
                reason: e.to_string(),
            })?;
        let deps = depfile::parse(&text);
        if deps.is_empty() {
            return Err(ToolchainError::Depfile {
                path: tmp_depfile.to_path_buf(),
                reason: "no prerequisites in compiler dependency output".to_string(),
            });
        }
        Ok(deps)
    }
}

/// Picks the most useful diagnostic stream: stderr, falling back to stdout.
pub(crate) fn diagnostic_text(stderr: &[u8], stdout: &[u8]) -> String {
    let err = String::from_utf8_lossy(stderr);
    if err.trim().is_empty() {
        String::from_utf8_lossy(stdout).into_owned()
    } else {
        err.into_owned()
    }
}
