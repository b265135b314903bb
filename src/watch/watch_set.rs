// src/watch/watch_set.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use crate::errors::Result;
use crate::watch::extra::ExtraPathSet;

/// Something that delivers change notifications for individual paths.
///
/// Subscriptions are never recursive: a directory subscription reports
/// changes to its direct entries only.
pub trait PathSubscriber: Send {
    fn subscribe(&mut self, path: &Path) -> Result<()>;
    fn unsubscribe(&mut self, path: &Path) -> Result<()>;
}

impl PathSubscriber for RecommendedWatcher {
    fn subscribe(&mut self, path: &Path) -> Result<()> {
        self.watch(path, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    fn unsubscribe(&mut self, path: &Path) -> Result<()> {
        self.unwatch(path)?;
        Ok(())
    }
}

/// The set of paths currently subscribed, plus the subscriber itself.
///
/// Owned by exactly one task (the watcher event loop).
#[derive(Debug)]
pub struct WatchSet<S> {
    subscriber: S,
    paths: BTreeSet<PathBuf>,
}

impl<S: PathSubscriber> WatchSet<S> {
    pub fn new(subscriber: S) -> Self {
        Self {
            subscriber,
            paths: BTreeSet::new(),
        }
    }

    /// Subscribe to the unit directories and the extra paths.
    ///
    /// Used at startup, where any failure is fatal.
    pub fn initialize(subscriber: S, dirs: &[PathBuf], extra: &ExtraPathSet) -> Result<Self> {
        let mut set = Self::new(subscriber);
        for dir in dirs {
            debug!(path = %dir.display(), "watch");
            set.add(dir)?;
        }
        for path in extra.iter() {
            debug!(path = %path.display(), "watch (extra)");
            set.add(path)?;
        }
        Ok(set)
    }

    /// Subscribe to `path`. Returns `Ok(false)` if it already was.
    pub fn add(&mut self, path: &Path) -> Result<bool> {
        if self.paths.contains(path) {
            return Ok(false);
        }
        self.subscriber.subscribe(path)?;
        self.paths.insert(path.to_path_buf());
        Ok(true)
    }

    /// Forget `path` and every tracked path below it. Returns `Ok(false)`
    /// if none of them was subscribed.
    ///
    /// Paths leave the set even when the subscriber fails to drop them
    /// (they may already be gone along with the file). Failures for nested
    /// paths are only logged; a failure for `path` itself is returned.
    pub fn remove(&mut self, path: &Path) -> Result<bool> {
        let nested: Vec<PathBuf> = self
            .paths
            .iter()
            .filter(|p| p.as_path() != path && p.starts_with(path))
            .cloned()
            .collect();
        for child in &nested {
            self.paths.remove(child);
            if let Err(err) = self.subscriber.unsubscribe(child) {
                debug!(path = %child.display(), error = %err, "failed to unwatch nested path");
            }
        }

        if !self.paths.remove(path) {
            return Ok(!nested.is_empty());
        }
        self.subscriber.unsubscribe(path)?;
        Ok(true)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
