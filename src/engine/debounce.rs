// src/engine/debounce.rs

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

use crate::engine::Trigger;
use crate::exec::{Builder, SupervisorHandle};

/// Pure debounce state: the number of change signals since the last build.
///
/// A non-zero count means the quiet-period timer is armed. Owned by the
/// trigger queue loop only.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    pending: usize,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one change signal. Returns true if this armed an idle timer.
    pub fn record(&mut self) -> bool {
        self.pending += 1;
        self.pending == 1
    }

    pub fn is_armed(&self) -> bool {
        self.pending > 0
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// The quiet period elapsed. Returns how many signals the build covers
    /// and disarms; `None` if nothing was pending.
    pub fn fire(&mut self) -> Option<usize> {
        if self.pending == 0 {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}

/// Run the debounced trigger queue until the trigger channel closes or the
/// supervisor goes away.
///
/// Every trigger restarts the quiet-period timer. When it expires, exactly
/// one build runs, inline: triggers arriving during the build wait in the
/// channel and arm the next cycle. A successful build is followed by a
/// restart request to the supervisor.
pub async fn run_trigger_queue<B: Builder>(
    mut triggers: mpsc::Receiver<Trigger>,
    mut builder: B,
    supervisor: SupervisorHandle,
    quiet_period: Duration,
) {
    let mut debouncer = Debouncer::new();
    let timer = sleep(quiet_period);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            maybe = triggers.recv() => {
                let Some(trigger) = maybe else {
                    debug!("trigger channel closed; stopping trigger queue");
                    break;
                };
                let armed = debouncer.record();
                trace!(?trigger, armed, pending = debouncer.pending(), "trigger received");
                timer.as_mut().reset(Instant::now() + quiet_period);
            }
            () = &mut timer, if debouncer.is_armed() => {
                let coalesced = debouncer.fire().unwrap_or_default();
                debug!(coalesced, "quiet period elapsed; building");

                let outcome = builder.build().await;
                if outcome.success && !supervisor.restart().await {
                    debug!("supervisor gone; stopping trigger queue");
                    break;
                }
            }
        }
    }
}
