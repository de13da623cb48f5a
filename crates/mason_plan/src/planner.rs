//! Staleness analysis: deciding what to recompile and whether to relink.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::PlanError;
use crate::record::RecordStore;
use crate::unit::SourceUnit;

/// Why a unit must be recompiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// No object artifact exists for the unit.
    MissingObject,
    /// No dependency record exists (cold start, or record invalidated).
    MissingRecord,
    /// The source file is newer than its object artifact.
    SourceNewer,
    /// A recorded dependency is newer than the object artifact.
    DependencyNewer(PathBuf),
    /// A recorded dependency path no longer exists. Treated conservatively
    /// as stale rather than silently dropping the edge.
    DependencyVanished(PathBuf),
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::MissingObject => write!(f, "no object file"),
            StaleReason::MissingRecord => write!(f, "no dependency record"),
            StaleReason::SourceNewer => write!(f, "source changed"),
            StaleReason::DependencyNewer(dep) => {
                write!(f, "dependency {} changed", dep.display())
            }
            StaleReason::DependencyVanished(dep) => {
                write!(f, "dependency {} no longer exists", dep.display())
            }
        }
    }
}

/// A non-fatal condition noticed during planning, reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanWarning {
    /// A recorded dependency path vanished; the owning unit was forced stale.
    VanishedDependency {
        /// The unit whose record lists the vanished path.
        unit: PathBuf,
        /// The dependency path that no longer exists.
        dep: PathBuf,
    },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::VanishedDependency { unit, dep } => write!(
                f,
                "recorded dependency {} of {} no longer exists; recompiling",
                dep.display(),
                unit.display()
            ),
        }
    }
}

/// The outcome of staleness analysis for one invocation.
///
/// Stale units are independent of each other and may be compiled in any
/// order, or in parallel. Both lists are sorted by source path so output
/// and tests are deterministic.
#[derive(Debug)]
pub struct BuildPlan {
    /// Units that must be recompiled, with the reason each one is stale.
    pub stale: Vec<(SourceUnit, StaleReason)>,
    /// Units whose artifacts are up to date.
    pub fresh: Vec<SourceUnit>,
    /// Whether the link step must rerun: true iff any unit is stale or the
    /// executable is absent.
    pub must_link: bool,
    /// Non-fatal conditions noticed while planning.
    pub warnings: Vec<PlanWarning>,
}

impl BuildPlan {
    /// Returns `true` if nothing needs to be compiled or linked.
    pub fn is_up_to_date(&self) -> bool {
        self.stale.is_empty() && !self.must_link
    }
}

/// Computes build plans from source units and their recorded dependencies.
pub struct Planner<'a> {
    store: &'a RecordStore,
}

impl<'a> Planner<'a> {
    /// Creates a planner reading records from `store`.
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Determines the stale subset of `units` and whether `exe_path` must be
    /// relinked.
    ///
    /// Errors on an empty unit set or a unit whose source file is missing;
    /// everything else that can go wrong with persisted state (absent or
    /// unreadable records, vanished dependencies) degrades to staleness.
    pub fn plan(&self, units: &[SourceUnit], exe_path: &Path) -> Result<BuildPlan, PlanError> {
        if units.is_empty() {
            return Err(PlanError::EmptyUnitSet);
        }

        let mut stale = Vec::new();
        let mut fresh = Vec::new();
        let mut warnings = Vec::new();

        for unit in units {
            match self.staleness(unit, &mut warnings)? {
                Some(reason) => stale.push((unit.clone(), reason)),
                None => fresh.push(unit.clone()),
            }
        }

        stale.sort_by(|a, b| a.0.path.cmp(&b.0.path));
        fresh.sort_by(|a, b| a.path.cmp(&b.path));

        let must_link = !stale.is_empty() || !exe_path.exists();

        Ok(BuildPlan {
            stale,
            fresh,
            must_link,
            warnings,
        })
    }

    /// Returns why `unit` is stale, or `None` if it is fresh.
    fn staleness(
        &self,
        unit: &SourceUnit,
        warnings: &mut Vec<PlanWarning>,
    ) -> Result<Option<StaleReason>, PlanError> {
        // The source itself must exist; that is an input contract, not a
        // staleness question.
        let source_mtime = match mtime(&unit.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PlanError::MissingSource {
                    path: unit.path.clone(),
                })
            }
            Err(e) => {
                return Err(PlanError::Io {
                    path: unit.path.clone(),
                    source: e,
                })
            }
        };

        let object_mtime = match mtime(&unit.object) {
            Ok(t) => t,
            Err(_) => return Ok(Some(StaleReason::MissingObject)),
        };

        let record = match self.store.load(unit) {
            Some(r) => r,
            None => return Ok(Some(StaleReason::MissingRecord)),
        };

        if source_mtime > object_mtime {
            return Ok(Some(StaleReason::SourceNewer));
        }

        for dep in &record.deps {
            match mtime(dep) {
                Ok(dep_mtime) if dep_mtime > object_mtime => {
                    return Ok(Some(StaleReason::DependencyNewer(dep.clone())));
                }
                Ok(_) => {}
                Err(_) => {
                    warnings.push(PlanWarning::VanishedDependency {
                        unit: unit.path.clone(),
                        dep: dep.clone(),
                    });
                    return Ok(Some(StaleReason::DependencyVanished(dep.clone())));
                }
            }
        }

        Ok(None)
    }
}

/// Reads a path's modification time.
fn mtime(path: &Path) -> std::io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DependencyRecord;
    use std::fs::File;
    use std::time::Duration;

    const VERSION: &str = "0.1.0";

    /// A scratch project: source dir, object dir, record store, and a fixed
    /// "now" that file timestamps are set relative to, so second-granularity
    /// filesystems cannot blur comparisons.
    struct Scratch {
        dir: tempfile::TempDir,
        store: RecordStore,
        now: SystemTime,
    }

    impl Scratch {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store = RecordStore::new(&dir.path().join("deps"), VERSION);
            Self {
                dir,
                store,
                now: SystemTime::now(),
            }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        /// Writes a file with mtime set to `now - age_secs`.
        fn file(&self, name: &str, age_secs: u64) -> PathBuf {
            let path = self.path(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, name).unwrap();
            set_mtime(&path, self.now - Duration::from_secs(age_secs));
            path
        }

        fn unit(&self, name: &str) -> SourceUnit {
            SourceUnit::new(self.path(name), &self.path("obj"))
        }

        fn record(&self, unit: &SourceUnit, deps: &[&PathBuf]) {
            let record = DependencyRecord::new(
                unit,
                deps.iter().map(|p| (*p).clone()).collect(),
                VERSION,
            );
            self.store.store(unit, &record).unwrap();
        }

        fn planner(&self) -> Planner<'_> {
            Planner::new(&self.store)
        }
    }

    fn set_mtime(path: &Path, t: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(t)
            .unwrap();
    }

    /// Builds a fully fresh unit: source older than object, record present.
    fn fresh_unit(s: &Scratch, name: &str) -> SourceUnit {
        let src = s.file(name, 100);
        let unit = s.unit(name);
        std::fs::create_dir_all(unit.object.parent().unwrap()).unwrap();
        std::fs::write(&unit.object, "obj").unwrap();
        set_mtime(&unit.object, s.now - Duration::from_secs(10));
        s.record(&unit, &[&src]);
        unit
    }

    #[test]
    fn empty_unit_set_is_an_error() {
        let s = Scratch::new();
        let exe = s.path("exe");
        assert!(matches!(
            s.planner().plan(&[], &exe),
            Err(PlanError::EmptyUnitSet)
        ));
    }

    #[test]
    fn missing_source_is_an_error() {
        let s = Scratch::new();
        let unit = s.unit("never_created.c");
        match s.planner().plan(&[unit], &s.path("exe")) {
            Err(PlanError::MissingSource { path }) => {
                assert!(path.ends_with("never_created.c"))
            }
            other => panic!("expected MissingSource, got {other:?}"),
        }
    }

    #[test]
    fn cold_start_marks_stale() {
        let s = Scratch::new();
        s.file("main.c", 100);
        let unit = s.unit("main.c");

        let plan = s.planner().plan(&[unit], &s.path("exe")).unwrap();
        assert_eq!(plan.stale.len(), 1);
        assert_eq!(plan.stale[0].1, StaleReason::MissingObject);
        assert!(plan.must_link);
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn missing_record_marks_stale() {
        let s = Scratch::new();
        s.file("main.c", 100);
        let unit = s.unit("main.c");
        std::fs::create_dir_all(unit.object.parent().unwrap()).unwrap();
        std::fs::write(&unit.object, "obj").unwrap();

        let plan = s.planner().plan(&[unit], &s.path("exe")).unwrap();
        assert_eq!(plan.stale[0].1, StaleReason::MissingRecord);
    }

    #[test]
    fn fresh_unit_with_present_exe_needs_nothing() {
        let s = Scratch::new();
        let unit = fresh_unit(&s, "main.c");
        let exe = s.file("exe", 5);

        let plan = s.planner().plan(&[unit], &exe).unwrap();
        assert!(plan.stale.is_empty());
        assert_eq!(plan.fresh.len(), 1);
        assert!(!plan.must_link);
        assert!(plan.is_up_to_date());
    }

    #[test]
    fn planning_is_idempotent() {
        let s = Scratch::new();
        let unit = fresh_unit(&s, "main.c");
        let exe = s.file("exe", 5);

        let first = s.planner().plan(std::slice::from_ref(&unit), &exe).unwrap();
        let second = s.planner().plan(&[unit], &exe).unwrap();
        assert!(first.is_up_to_date());
        assert!(second.is_up_to_date());
    }

    #[test]
    fn newer_source_marks_stale() {
        let s = Scratch::new();
        let unit = fresh_unit(&s, "main.c");
        set_mtime(&unit.path, s.now);

        let plan = s.planner().plan(&[unit], &s.file("exe", 5)).unwrap();
        assert_eq!(plan.stale[0].1, StaleReason::SourceNewer);
        assert!(plan.must_link);
    }

    #[test]
    fn touched_header_propagates_to_unit() {
        let s = Scratch::new();
        let src = s.file("main.c", 100);
        let header = s.file("util.h", 100);
        let unit = s.unit("main.c");
        std::fs::create_dir_all(unit.object.parent().unwrap()).unwrap();
        std::fs::write(&unit.object, "obj").unwrap();
        set_mtime(&unit.object, s.now - Duration::from_secs(10));
        s.record(&unit, &[&src, &header]);

        // Bump only the header past the object.
        set_mtime(&header, s.now);

        let plan = s.planner().plan(&[unit], &s.file("exe", 5)).unwrap();
        assert_eq!(plan.stale.len(), 1);
        assert_eq!(
            plan.stale[0].1,
            StaleReason::DependencyNewer(header.clone())
        );
    }

    #[test]
    fn vanished_dependency_marks_stale_with_warning() {
        let s = Scratch::new();
        let src = s.file("main.c", 100);
        let header = s.file("util.h", 100);
        let unit = s.unit("main.c");
        std::fs::create_dir_all(unit.object.parent().unwrap()).unwrap();
        std::fs::write(&unit.object, "obj").unwrap();
        set_mtime(&unit.object, s.now - Duration::from_secs(10));
        s.record(&unit, &[&src, &header]);

        std::fs::remove_file(&header).unwrap();

        let plan = s.planner().plan(&[unit.clone()], &s.file("exe", 5)).unwrap();
        assert_eq!(
            plan.stale[0].1,
            StaleReason::DependencyVanished(header.clone())
        );
        assert_eq!(
            plan.warnings,
            vec![PlanWarning::VanishedDependency {
                unit: unit.path,
                dep: header,
            }]
        );
    }

    #[test]
    fn missing_executable_forces_link_even_when_all_fresh() {
        let s = Scratch::new();
        let unit = fresh_unit(&s, "main.c");

        let plan = s.planner().plan(&[unit], &s.path("no_exe")).unwrap();
        assert!(plan.stale.is_empty());
        assert!(plan.must_link);
        assert!(!plan.is_up_to_date());
    }

    #[test]
    fn stale_units_sorted_by_path() {
        let s = Scratch::new();
        s.file("zeta.c", 100);
        s.file("alpha.c", 100);
        let units = vec![s.unit("zeta.c"), s.unit("alpha.c")];

        let plan = s.planner().plan(&units, &s.path("exe")).unwrap();
        assert!(plan.stale[0].0.path.ends_with("alpha.c"));
        assert!(plan.stale[1].0.path.ends_with("zeta.c"));
    }

    /// The full three-unit scenario: `main.c` includes `a.h`, `a.c` includes
    /// `b.h`, `b.c` stands alone.
    #[test]
    fn end_to_end_touch_propagation() {
        let s = Scratch::new();
        let main_src = s.file("main.c", 100);
        let a_src = s.file("a.c", 100);
        let b_src = s.file("b.c", 100);
        let a_h = s.file("a.h", 100);
        let b_h = s.file("b.h", 100);

        let units = [s.unit("main.c"), s.unit("a.c"), s.unit("b.c")];
        for unit in &units {
            std::fs::create_dir_all(unit.object.parent().unwrap()).unwrap();
            std::fs::write(&unit.object, "obj").unwrap();
            set_mtime(&unit.object, s.now - Duration::from_secs(10));
        }
        s.record(&units[0], &[&main_src, &a_h]);
        s.record(&units[1], &[&a_src, &b_h]);
        s.record(&units[2], &[&b_src]);
        let exe = s.file("exe", 5);

        // Second build with no changes: nothing stale, no link.
        let plan = s.planner().plan(&units, &exe).unwrap();
        assert!(plan.is_up_to_date());

        // Touch b.h: only a.c is stale, because only its record lists b.h.
        set_mtime(&b_h, s.now);
        let plan = s.planner().plan(&units, &exe).unwrap();
        assert_eq!(plan.stale.len(), 1);
        assert!(plan.stale[0].0.path.ends_with("a.c"));
        assert!(plan.must_link);
    }

    /// An edge that was never recorded does not propagate: if a.c's record
    /// omits b.h, touching b.h leaves a.c fresh. Recording is the only
    /// source of dependency knowledge.
    #[test]
    fn unrecorded_edge_does_not_propagate() {
        let s = Scratch::new();
        let a_src = s.file("a.c", 100);
        let b_h = s.file("b.h", 100);
        let unit = s.unit("a.c");
        std::fs::create_dir_all(unit.object.parent().unwrap()).unwrap();
        std::fs::write(&unit.object, "obj").unwrap();
        set_mtime(&unit.object, s.now - Duration::from_secs(10));
        s.record(&unit, &[&a_src]); // b.h deliberately absent

        set_mtime(&b_h, s.now);

        let plan = s.planner().plan(&[unit], &s.file("exe", 5)).unwrap();
        assert!(plan.stale.is_empty());
    }
}
