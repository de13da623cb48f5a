//! Configuration types deserialized from `mason.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level project configuration parsed from `mason.toml`.
///
/// Contains the project metadata plus optional build-layout and toolchain
/// tables, both of which fall back to sensible defaults when omitted.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, version).
    pub project: ProjectMeta,
    /// Source and output directory layout.
    #[serde(default)]
    pub build: BuildConfig,
    /// Compiler and linker invocation settings.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// Core project metadata required in every `mason.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name. Also names the linked executable.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// List of project authors.
    #[serde(default)]
    pub authors: Vec<String>,
}

/// Source and output directory layout, relative to the project root.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Directory searched (recursively) for `.c` source units.
    #[serde(default = "default_src_dir")]
    pub src_dir: PathBuf,
    /// Directory receiving object files and the linked executable.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            out_dir: default_out_dir(),
        }
    }
}

fn default_src_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("build")
}

/// Compiler and linker invocation settings.
///
/// The compiler driver doubles as the linker driver, the usual arrangement
/// for C toolchains (`cc` both compiles and links).
#[derive(Debug, Deserialize)]
pub struct ToolchainConfig {
    /// Compiler driver executable name or path.
    #[serde(default = "default_cc")]
    pub cc: String,
    /// Extra flags passed to every compile invocation.
    #[serde(default)]
    pub cflags: Vec<String>,
    /// Extra flags passed to the link invocation (after the object list, so
    /// library flags resolve in the conventional order).
    #[serde(default)]
    pub ldflags: Vec<String>,
    /// Include search directories, relative to the project root.
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            cc: default_cc(),
            cflags: Vec::new(),
            ldflags: Vec::new(),
            include_dirs: Vec::new(),
        }
    }
}

fn default_cc() -> String {
    "cc".to_string()
}
