// src/resolve/resolver.rs

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::errors::{Result, RewatchError};
use crate::resolve::graph::DependencyGraph;
use crate::resolve::unit::{Unit, UnitId, UnitSource, is_skipped_import};

/// Outcome of dependency discovery. Computed once at startup; later changes
/// to the import graph are not picked up until the tool is restarted.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The command being developed.
    pub root: Unit,
    /// Every discovered unit, root first, in discovery order.
    pub units: Vec<Unit>,
}

impl Resolution {
    /// Directories of all non-foundation units, deduplicated, in discovery order.
    pub fn watch_dirs(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        self.units
            .iter()
            .filter(|u| !u.foundation)
            .filter(|u| seen.insert(u.dir.clone()))
            .map(|u| u.dir.clone())
            .collect()
    }

    /// Units excluded from watching.
    pub fn foundation_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.foundation)
    }

    pub fn graph(&self) -> DependencyGraph<'_> {
        DependencyGraph::from_units(&self.units)
    }

    /// Path of the executable produced by building the root.
    pub fn binary_path(&self) -> Result<PathBuf> {
        match (&self.root.target, self.root.command) {
            (Some(target), true) => Ok(target.clone()),
            _ => Err(RewatchError::NotACommand(self.root.id.clone())),
        }
    }
}

/// Shared between the loaders of one level. One lock guards both fields.
#[derive(Debug, Default)]
struct ResolveState {
    seen: HashSet<UnitId>,
    units: Vec<Unit>,
}

fn lock_state(state: &Mutex<ResolveState>) -> Result<std::sync::MutexGuard<'_, ResolveState>> {
    state
        .lock()
        .map_err(|_| RewatchError::Other(anyhow::anyhow!("resolver state mutex poisoned")))
}

/// Discover the transitive closure of units `root_id` depends on.
///
/// Traversal is breadth-first. All direct dependencies of one level are
/// loaded concurrently and the level completes before the next one starts.
/// Foundation units are traversed too, so their imports are not lost, but
/// they never show up in [`Resolution::watch_dirs`]. Any unit that cannot be
/// loaded fails the whole resolution.
pub async fn resolve(source: Arc<dyn UnitSource>, root_id: &str) -> Result<Resolution> {
    let started = Instant::now();
    let root = source.load(root_id).await?;
    info!(package = %root.id, "watching package");

    let state = Arc::new(Mutex::new(ResolveState::default()));
    {
        let mut st = lock_state(&state)?;
        st.seen.insert(root_id.to_string());
        st.seen.insert(root.id.clone());
        st.units.push(root.clone());
    }

    let mut level = vec![root.clone()];
    let mut depth = 0usize;

    while !level.is_empty() {
        let mut loaders = JoinSet::new();

        for unit in &level {
            for import in &unit.imports {
                if is_skipped_import(import) {
                    continue;
                }
                if !lock_state(&state)?.seen.insert(import.clone()) {
                    continue;
                }

                let source = Arc::clone(&source);
                let state = Arc::clone(&state);
                let import = import.clone();
                loaders.spawn(async move {
                    let t0 = Instant::now();
                    let loaded = source.load(&import).await?;
                    debug!(import = %import, elapsed = ?t0.elapsed(), "import");
                    let mut st = lock_state(&state)?;
                    st.seen.insert(loaded.id.clone());
                    st.units.push(loaded.clone());
                    Ok::<Unit, RewatchError>(loaded)
                });
            }
        }

        let mut next = Vec::with_capacity(loaders.len());
        while let Some(joined) = loaders.join_next().await {
            let loaded = joined.map_err(|e| {
                RewatchError::Other(anyhow::anyhow!("dependency loader task failed: {e}"))
            })??;
            next.push(loaded);
        }

        depth += 1;
        debug!(depth, discovered = next.len(), "resolved dependency level");
        level = next;
    }

    let units = std::mem::take(&mut lock_state(&state)?.units);

    let resolution = Resolution { root, units };
    info!(
        units = resolution.units.len(),
        watched_dirs = resolution.watch_dirs().len(),
        elapsed = ?started.elapsed(),
        "dependency discovery complete"
    );
    Ok(resolution)
}

/// Unique import paths referenced by `units` that are never resolved.
pub fn skipped_imports(units: &[Unit]) -> BTreeSet<&str> {
    units
        .iter()
        .flat_map(|u| u.imports.iter())
        .map(String::as_str)
        .filter(|id| is_skipped_import(id))
        .collect()
}
