use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rewatch::errors::{Result, RewatchError};
use rewatch::exec::{BuildOutcome, Builder};
use rewatch::resolve::{Unit, UnitSource};
use rewatch::watch::PathSubscriber;

/// In-memory unit source.
///
/// - unknown ids fail with `PackageNotFound`
/// - every call is recorded, so tests can check nothing loads twice
/// - an optional delay makes loads overlap
#[derive(Debug, Clone, Default)]
pub struct FakeUnitSource {
    units: Arc<HashMap<String, Unit>>,
    loads: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl FakeUnitSource {
    pub fn new(units: impl IntoIterator<Item = Unit>) -> Self {
        Self {
            units: Arc::new(units.into_iter().map(|u| (u.id.clone(), u)).collect()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Ids passed to `load`, in call order.
    pub fn loads(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }

    pub fn load_count(&self, id: &str) -> usize {
        self.loads().iter().filter(|l| *l == id).count()
    }

    /// Highest number of loads that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl UnitSource for FakeUnitSource {
    fn load<'a>(&'a self, id: &'a str) -> Pin<Box<dyn Future<Output = Result<Unit>> + Send + 'a>> {
        Box::pin(async move {
            self.loads.lock().unwrap().push(id.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.units
                .get(id)
                .cloned()
                .ok_or_else(|| RewatchError::PackageNotFound(id.to_string()))
        })
    }
}

/// Builder that returns scripted outcomes and counts builds.
///
/// Once the script runs out every further build succeeds.
#[derive(Debug, Clone, Default)]
pub struct FakeBuilder {
    script: Arc<Mutex<VecDeque<bool>>>,
    builds: Arc<AtomicUsize>,
}

impl FakeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            script: Arc::new(Mutex::new(outcomes.into_iter().collect())),
            ..Self::default()
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl Builder for FakeBuilder {
    fn build(&mut self) -> Pin<Box<dyn Future<Output = BuildOutcome> + Send + '_>> {
        Box::pin(async move {
            self.builds.fetch_add(1, Ordering::SeqCst);
            let success = self.script.lock().unwrap().pop_front().unwrap_or(true);
            BuildOutcome {
                success,
                duration: Duration::ZERO,
            }
        })
    }
}

/// One call made on a [`RecordingSubscriber`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriberOp {
    Subscribe(PathBuf),
    Unsubscribe(PathBuf),
}

/// Subscriber that records calls instead of talking to the OS.
///
/// Paths registered with [`fail_on`](Self::fail_on) make `subscribe` fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingSubscriber {
    ops: Arc<Mutex<Vec<SubscriberOp>>>,
    failing: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.failing.lock().unwrap().push(path.into());
    }

    pub fn ops(&self) -> Vec<SubscriberOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn subscribed(&self) -> Vec<PathBuf> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                SubscriberOp::Subscribe(p) => Some(p),
                SubscriberOp::Unsubscribe(_) => None,
            })
            .collect()
    }

    pub fn unsubscribed(&self) -> Vec<PathBuf> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                SubscriberOp::Unsubscribe(p) => Some(p),
                SubscriberOp::Subscribe(_) => None,
            })
            .collect()
    }
}

impl PathSubscriber for RecordingSubscriber {
    fn subscribe(&mut self, path: &Path) -> Result<()> {
        if self.failing.lock().unwrap().iter().any(|p| p == path) {
            return Err(RewatchError::Other(anyhow::anyhow!(
                "cannot subscribe to {}",
                path.display()
            )));
        }
        self.ops
            .lock()
            .unwrap()
            .push(SubscriberOp::Subscribe(path.to_path_buf()));
        Ok(())
    }

    fn unsubscribe(&mut self, path: &Path) -> Result<()> {
        self.ops
            .lock()
            .unwrap()
            .push(SubscriberOp::Unsubscribe(path.to_path_buf()));
        Ok(())
    }
}
