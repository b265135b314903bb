// src/watch/event_handler.rs

//! Per-path decisions for filesystem events.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::event::FsOp;
use crate::watch::filter::SourceFilter;
use crate::watch::walk::collect_new_tree;
use crate::watch::watch_set::{PathSubscriber, WatchSet};

/// What to do with the watch set for one event path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPlan {
    /// No trigger, no watch-set change.
    Ignore,
    /// Subscribe to these paths, then trigger.
    Subscribe(Vec<PathBuf>),
    /// Drop this path from the watch set (if present), then trigger.
    Unsubscribe(PathBuf),
}

/// Result of applying an [`EventPlan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub trigger: bool,
}

/// Decide how to react to `op` on `path`.
///
/// `tracked` says whether `path` is currently in the watch set. This may
/// walk directories, so callers on an async runtime should run it on the
/// blocking pool.
///
/// - Create / write / rename of a directory: subscribe to the whole tree.
/// - Create / write / rename of a qualifying file: subscribe to it.
/// - Anything else that still exists but does not qualify: ignored.
/// - A renamed path that no longer exists is handled like a removal.
/// - Remove: unsubscribe, but only tracked or qualifying paths trigger.
/// - Permission changes and reads: ignored.
pub fn plan_event(
    fs: &dyn FileSystem,
    filter: &SourceFilter,
    tracked: bool,
    op: FsOp,
    path: &Path,
) -> EventPlan {
    match op {
        FsOp::Chmod | FsOp::Ignored => EventPlan::Ignore,
        FsOp::Remove => plan_removal(filter, tracked, path),
        FsOp::Create | FsOp::Write | FsOp::Rename => {
            if !fs.exists(path) {
                if op == FsOp::Rename {
                    return plan_removal(filter, tracked, path);
                }
                debug!(path = %path.display(), ?op, "path vanished before it could be inspected");
                return EventPlan::Ignore;
            }

            if fs.is_dir(path) && !fs.is_symlink(path) {
                EventPlan::Subscribe(collect_new_tree(fs, path, filter))
            } else if filter.matches(path) {
                EventPlan::Subscribe(vec![path.to_path_buf()])
            } else {
                EventPlan::Ignore
            }
        }
    }
}

fn plan_removal(filter: &SourceFilter, tracked: bool, path: &Path) -> EventPlan {
    if tracked || filter.matches(path) {
        EventPlan::Unsubscribe(path.to_path_buf())
    } else {
        EventPlan::Ignore
    }
}

/// Apply `plan` to the watch set.
///
/// Subscription failures are logged and skipped; they never stop the
/// trigger for an accepted event.
pub fn apply_plan<S: PathSubscriber>(watch_set: &mut WatchSet<S>, plan: EventPlan) -> EventOutcome {
    let mut outcome = EventOutcome::default();

    match plan {
        EventPlan::Ignore => {}
        EventPlan::Subscribe(paths) => {
            for path in paths {
                match watch_set.add(&path) {
                    Ok(true) => {
                        debug!(path = %path.display(), "watch");
                        outcome.added.push(path);
                    }
                    Ok(false) => {}
                    Err(err) => {
                        debug!(path = %path.display(), error = %err, "failed to watch path");
                    }
                }
            }
            outcome.trigger = true;
        }
        EventPlan::Unsubscribe(path) => {
            match watch_set.remove(&path) {
                Ok(true) => {
                    debug!(path = %path.display(), "unwatch");
                    outcome.removed.push(path);
                }
                Ok(false) => {}
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "failed to unwatch path");
                    outcome.removed.push(path);
                }
            }
            outcome.trigger = true;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::watch::extra::ExtraPathSet;

    fn filter() -> SourceFilter {
        let extra: ExtraPathSet = [PathBuf::from("/w/app.yaml")].into_iter().collect();
        SourceFilter::new("go", extra)
    }

    #[test]
    fn chmod_is_ignored_even_for_sources() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/main.go");
        let plan = plan_event(&fs, &filter(), true, FsOp::Chmod, Path::new("/w/main.go"));
        assert_eq!(plan, EventPlan::Ignore);
    }

    #[test]
    fn non_source_write_is_ignored() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/notes.txt");
        let plan = plan_event(&fs, &filter(), false, FsOp::Write, Path::new("/w/notes.txt"));
        assert_eq!(plan, EventPlan::Ignore);
    }

    #[test]
    fn source_and_extra_writes_subscribe_the_file() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/main.go");
        fs.add_file("/w/app.yaml");

        for path in ["/w/main.go", "/w/app.yaml"] {
            let plan = plan_event(&fs, &filter(), false, FsOp::Write, Path::new(path));
            assert_eq!(plan, EventPlan::Subscribe(vec![PathBuf::from(path)]));
        }
    }

    #[test]
    fn vanished_create_is_ignored_but_vanished_rename_is_a_removal() {
        let fs = MockFileSystem::new();
        let path = Path::new("/w/old.go");
        assert_eq!(plan_event(&fs, &filter(), false, FsOp::Create, path), EventPlan::Ignore);
        assert_eq!(
            plan_event(&fs, &filter(), false, FsOp::Rename, path),
            EventPlan::Unsubscribe(path.to_path_buf())
        );
    }

    #[test]
    fn removal_of_untracked_non_source_is_ignored() {
        let fs = MockFileSystem::new();
        let plan = plan_event(&fs, &filter(), false, FsOp::Remove, Path::new("/w/a.txt"));
        assert_eq!(plan, EventPlan::Ignore);

        let plan = plan_event(&fs, &filter(), true, FsOp::Remove, Path::new("/w/sub"));
        assert_eq!(plan, EventPlan::Unsubscribe(PathBuf::from("/w/sub")));
    }
}
