//! `mason build` — incremental compilation and linking.
//!
//! Orchestrates one build invocation:
//! 1. Resolve the project root and load `mason.toml`
//! 2. Discover source units
//! 3. Plan: decide the stale subset and whether to relink
//! 4. Compile stale units in parallel, persisting a dependency record per
//!    unit strictly after its compilation succeeds
//! 5. Link, a join barrier after all compilations
//!
//! Failure policy is fail-fast: the first compile error stops scheduling of
//! further units and the invocation exits non-zero without linking.
//! Compilations already in flight run to completion and their records
//! persist, so the next invocation does not redo their work.

use std::path::PathBuf;

use mason_common::touch_now;
use mason_config::ResolvedLayout;
use mason_plan::{DependencyRecord, Planner, RecordStore, SourceUnit};
use mason_toolchain::{Compiler, Linker};
use rayon::prelude::*;

use crate::pipeline::{discover_source_files, resolve_project_root};
use crate::{BuildArgs, GlobalArgs, MASON_VERSION};

/// Runs the `mason build` command.
///
/// Returns exit code 0 on success, 1 on any compile or link failure.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = mason_config::load_config(&project_dir)?;
    let layout = ResolvedLayout::resolve(&config, &project_dir);

    if !global.quiet {
        eprintln!(
            "   Building {} v{}",
            config.project.name, config.project.version
        );
    }

    let sources = if layout.src_dir.is_dir() {
        discover_source_files(&layout.src_dir)?
    } else {
        Vec::new()
    };
    if sources.is_empty() {
        eprintln!(
            "error: no C source files found in {}",
            layout.src_dir.display()
        );
        return Ok(1);
    }

    let units: Vec<SourceUnit> = sources
        .into_iter()
        .map(|path| SourceUnit::new(path, &layout.obj_dir))
        .collect();

    let store = RecordStore::new(&layout.record_dir, MASON_VERSION);
    let plan = Planner::new(&store).plan(&units, &layout.exe_path)?;

    if !global.quiet {
        for warning in &plan.warnings {
            eprintln!("warning: {warning}");
        }
    }
    if global.verbose {
        for (unit, reason) in &plan.stale {
            eprintln!("     Stale {} ({reason})", unit.path.display());
        }
    }

    if plan.is_up_to_date() {
        if !global.quiet {
            eprintln!("  Finished {} (up to date)", layout.exe_path.display());
        }
        return Ok(0);
    }

    // Safe under concurrent first-time creation: already-exists is success.
    std::fs::create_dir_all(&layout.obj_dir)?;

    if !plan.stale.is_empty() {
        let compiler = Compiler::new(
            &config.toolchain.cc,
            &config.toolchain.cflags,
            &layout.include_dirs,
        );
        if let Err(message) = compile_stale(&plan.stale, &compiler, &store, global, args.jobs) {
            eprintln!("error: {message}");
            return Ok(1);
        }
    }

    if !global.quiet {
        eprintln!("   Linking {}", layout.exe_path.display());
    }
    let mut objects: Vec<PathBuf> = units.iter().map(|u| u.object.clone()).collect();
    objects.sort();
    let linker = Linker::new(&config.toolchain.cc, &config.toolchain.ldflags);
    if let Err(e) = linker.link(&objects, &layout.exe_path) {
        eprintln!("error: {e}");
        return Ok(1);
    }

    if !global.quiet {
        eprintln!("  Finished {}", layout.exe_path.display());
    }
    Ok(0)
}

/// Compiles the stale units in parallel, fail-fast.
///
/// Returns the first failure's rendered message. Each unit's record is
/// stored only after its own compilation succeeded, then the object's mtime
/// is refreshed so it can never appear older than its record.
fn compile_stale(
    stale: &[(SourceUnit, mason_plan::StaleReason)],
    compiler: &Compiler,
    store: &RecordStore,
    global: &GlobalArgs,
    jobs: Option<usize>,
) -> Result<(), String> {
    let compile_one = |unit: &SourceUnit| -> Result<(), String> {
        if !global.quiet {
            eprintln!(" Compiling {}", unit.path.display());
        }
        let deps = compiler
            .compile(&unit.path, &unit.object)
            .map_err(|e| e.to_string())?;
        let record = DependencyRecord::new(unit, deps, MASON_VERSION);
        store.store(unit, &record).map_err(|e| e.to_string())?;
        touch_now(&unit.object)
            .map_err(|e| format!("failed to refresh {}: {e}", unit.object.display()))
    };

    let compile_all = || {
        stale
            .par_iter()
            .try_for_each(|(unit, _)| compile_one(unit))
    };

    match jobs {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .map_err(|e| e.to_string())?
            .install(compile_all),
        None => compile_all(),
    }
}
