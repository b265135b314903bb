// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use crate::engine::Trigger;
use crate::errors::{Result, RewatchError};
use crate::fs::FileSystem;
use crate::watch::event::FsOp;
use crate::watch::event_handler::{EventOutcome, EventPlan, apply_plan, plan_event};
use crate::watch::filter::SourceFilter;
use crate::watch::watch_set::{PathSubscriber, WatchSet};

/// Handle for the filesystem watcher task.
///
/// The task owns the `RecommendedWatcher`; dropping this handle aborts the
/// task and stops file watching.
pub struct WatcherHandle {
    task: JoinHandle<Result<()>>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

impl WatcherHandle {
    /// Resolve when the event loop ends. An error means watching broke down.
    pub async fn wait(&mut self) -> Result<()> {
        match (&mut self.task).await {
            Ok(res) => res,
            Err(join_err) => Err(RewatchError::Other(anyhow::anyhow!(
                "watcher task failed: {join_err}"
            ))),
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Subscribe to `dirs` plus the filter's extra paths and spawn the event loop.
///
/// Failing to create the watcher or any initial subscription is an error.
pub fn spawn_watcher(
    dirs: &[PathBuf],
    filter: SourceFilter,
    fs: Arc<dyn FileSystem>,
    trigger_tx: mpsc::Sender<Trigger>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // The receiver only goes away when the loop has stopped.
            let _ = event_tx.send(res);
        },
        Config::default(),
    )?;

    let watch_set = WatchSet::initialize(watcher, dirs, filter.extra())?;
    info!(paths = watch_set.len(), "file watcher started");

    let task = tokio::spawn(run_event_loop(
        watch_set,
        Arc::new(filter),
        fs,
        event_rx,
        trigger_tx,
    ));

    Ok(WatcherHandle { task })
}

/// Consume filesystem events one at a time, keep the watch set current and
/// forward a [`Trigger`] for every accepted path.
///
/// A watcher error ends the loop with that error. The loop also ends,
/// cleanly, when either channel closes.
pub async fn run_event_loop<S>(
    mut watch_set: WatchSet<S>,
    filter: Arc<SourceFilter>,
    fs: Arc<dyn FileSystem>,
    mut events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    trigger_tx: mpsc::Sender<Trigger>,
) -> Result<()>
where
    S: PathSubscriber + 'static,
{
    while let Some(res) = events.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                error!(error = %err, "file watch error");
                return Err(err.into());
            }
        };

        let op = FsOp::from(&event.kind);
        if matches!(op, FsOp::Chmod | FsOp::Ignored) {
            trace!(?event, "ignoring event");
            continue;
        }
        debug!(?op, paths = ?event.paths, "filesystem event");

        for path in event.paths {
            let outcome = handle_path(&mut watch_set, &filter, &fs, op, path.clone()).await;
            if !outcome.trigger {
                continue;
            }
            if trigger_tx.send(Trigger::FileChange(path)).await.is_err() {
                debug!("trigger queue closed; stopping watcher");
                return Ok(());
            }
        }
    }

    debug!("watcher event loop finished");
    Ok(())
}

async fn handle_path<S: PathSubscriber>(
    watch_set: &mut WatchSet<S>,
    filter: &Arc<SourceFilter>,
    fs: &Arc<dyn FileSystem>,
    op: FsOp,
    path: PathBuf,
) -> EventOutcome {
    let tracked = watch_set.contains(&path);

    let plan = if op.may_add() {
        // Directory walks touch the disk; keep them off the async workers.
        let fs = Arc::clone(fs);
        let filter = Arc::clone(filter);
        tokio::task::spawn_blocking(move || plan_event(fs.as_ref(), &filter, tracked, op, &path))
            .await
            .unwrap_or_else(|err| {
                debug!(error = %err, "event classification task failed");
                EventPlan::Ignore
            })
    } else {
        plan_event(fs.as_ref(), filter, tracked, op, &path)
    };

    apply_plan(watch_set, plan)
}
