//! `mason clean` — removing build artifacts.
//!
//! Removes the output directory (objects and the executable). Dependency
//! records are precious metadata with a lifecycle independent of the
//! artifacts; only `clean --full` removes them, making the next build cold.

use crate::pipeline::resolve_project_root;
use crate::{CleanArgs, GlobalArgs};

/// Runs the `mason clean` command.
pub fn run(args: &CleanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = mason_config::load_config(&project_dir)?;
    let layout = mason_config::ResolvedLayout::resolve(&config, &project_dir);

    if layout.out_dir.exists() {
        std::fs::remove_dir_all(&layout.out_dir)?;
        if !global.quiet {
            eprintln!("   Removed {}", layout.out_dir.display());
        }
    }

    if args.full && layout.metadata_dir.exists() {
        std::fs::remove_dir_all(&layout.metadata_dir)?;
        if !global.quiet {
            eprintln!("   Removed {}", layout.metadata_dir.display());
        }
    }

    Ok(0)
}
