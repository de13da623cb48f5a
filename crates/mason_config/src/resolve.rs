//! Layout resolution: turning a parsed configuration into concrete paths.

use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};

/// Subdirectory of the output directory holding object files.
const OBJ_SUBDIR: &str = "obj";

/// Directory at the project root holding mason's persistent metadata.
///
/// Lives outside the output directory on purpose: `clean` deletes the output
/// directory wholesale, and dependency records must survive that.
const METADATA_DIR: &str = ".mason";

/// Subdirectory of the metadata directory holding dependency records.
const DEPS_SUBDIR: &str = "deps";

/// The concrete filesystem layout for one project, with every configured
/// path resolved against the project root.
///
/// All build pipeline code takes paths from here rather than recomputing
/// them, so the layout decisions live in exactly one place.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    /// The project root (the directory containing `mason.toml`).
    pub project_dir: PathBuf,
    /// Directory searched for source units.
    pub src_dir: PathBuf,
    /// Output directory; deleted wholesale by `clean`.
    pub out_dir: PathBuf,
    /// Directory receiving object files, under the output directory.
    pub obj_dir: PathBuf,
    /// Path of the linked executable, named after the project.
    pub exe_path: PathBuf,
    /// Directory holding per-unit dependency records. Survives `clean`.
    pub record_dir: PathBuf,
    /// Root of the metadata tree; removed only by a full reset.
    pub metadata_dir: PathBuf,
    /// Include search directories for compilation.
    pub include_dirs: Vec<PathBuf>,
}

impl ResolvedLayout {
    /// Resolves the configured layout against a project root directory.
    ///
    /// Relative paths in the configuration are interpreted relative to
    /// `project_dir`; absolute paths are kept as-is.
    pub fn resolve(config: &ProjectConfig, project_dir: &Path) -> Self {
        let join = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                project_dir.join(p)
            }
        };

        let out_dir = join(&config.build.out_dir);
        let metadata_dir = project_dir.join(METADATA_DIR);

        Self {
            project_dir: project_dir.to_path_buf(),
            src_dir: join(&config.build.src_dir),
            obj_dir: out_dir.join(OBJ_SUBDIR),
            exe_path: out_dir.join(&config.project.name),
            out_dir,
            record_dir: metadata_dir.join(DEPS_SUBDIR),
            metadata_dir,
            include_dirs: config.toolchain.include_dirs.iter().map(|p| join(p)).collect(),
        }
    }
}
