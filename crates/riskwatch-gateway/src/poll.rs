//! Periodic view refresh.
//!
//! # Design
//! - Each view owns a [`ViewStore`] that publishes whole [`ViewSnapshot`]s through a
//!   `watch` channel, so readers never observe a half-applied update.
//! - Every fetch draws a sequence number; results older than the last applied one
//!   are dropped, which makes overlapping manual refreshes safe.
//! - Fetches run in detached tasks. Teardown closes the store, so an in-flight
//!   request may finish but its result is never applied.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{GatewayError, GatewayResult};

/// Something a view can poll.
#[async_trait]
pub trait ViewSource: Send + Sync + 'static {
    /// Payload published to the view.
    type Output: Send + Sync + 'static;

    /// Stable label used in logs.
    fn name(&self) -> &'static str;

    /// Perform one fetch against the backend.
    async fn fetch(&self) -> GatewayResult<Self::Output>;

    /// Placeholder data shown when the first fetch fails.
    fn fallback(&self) -> Option<Self::Output> {
        None
    }
}

/// Where a view is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Nothing requested yet.
    Idle,
    /// A request is outstanding.
    Fetching,
    /// The last applied fetch succeeded.
    Ready,
    /// The last applied fetch failed.
    Degraded,
}

/// Immutable published state of one view.
pub struct ViewSnapshot<T> {
    /// Refresh phase.
    pub phase: PollPhase,
    /// Latest data, possibly stale or fallback.
    pub data: Option<Arc<T>>,
    /// `true` when the last applied fetch reached the backend.
    pub connected: bool,
    /// When data was last replaced by a successful fetch.
    pub last_updated: Option<DateTime<Utc>>,
    /// Detail of the last applied failure.
    pub last_error: Option<String>,
    /// `true` while `data` holds the static placeholder.
    pub using_fallback: bool,
    /// Sequence number of the fetch that produced this snapshot.
    pub applied_sequence: u64,
}

impl<T> ViewSnapshot<T> {
    /// State before any fetch.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            phase: PollPhase::Idle,
            data: None,
            connected: false,
            last_updated: None,
            last_error: None,
            using_fallback: false,
            applied_sequence: 0,
        }
    }

    /// Borrow the payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }
}

impl<T> Clone for ViewSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            data: self.data.clone(),
            connected: self.connected,
            last_updated: self.last_updated,
            last_error: self.last_error.clone(),
            using_fallback: self.using_fallback,
            applied_sequence: self.applied_sequence,
        }
    }
}

impl<T> Debug for ViewSnapshot<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ViewSnapshot")
            .field("phase", &self.phase)
            .field("has_data", &self.data.is_some())
            .field("connected", &self.connected)
            .field("last_updated", &self.last_updated)
            .field("last_error", &self.last_error)
            .field("using_fallback", &self.using_fallback)
            .field("applied_sequence", &self.applied_sequence)
            .finish()
    }
}

/// What happened to a fetch result handed to [`ViewStore::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The snapshot was replaced.
    Applied,
    /// A newer fetch had already been applied.
    Stale,
    /// The view was torn down.
    Closed,
}

/// Owner of one view's published snapshot.
pub struct ViewStore<T> {
    name: &'static str,
    tx: watch::Sender<ViewSnapshot<T>>,
    next_sequence: AtomicU64,
    closed: AtomicBool,
}

impl<T> ViewStore<T> {
    /// Empty store in the idle phase.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(ViewSnapshot::idle());
        Self {
            name,
            tx,
            next_sequence: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// View label.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot<T>> {
        self.tx.subscribe()
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot<T> {
        self.tx.borrow().clone()
    }

    /// Reserve a sequence number for a new fetch and mark the view as fetching.
    pub fn begin(&self) -> u64 {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.is_closed() {
            self.tx.send_if_modified(|snapshot| {
                if snapshot.phase == PollPhase::Fetching {
                    return false;
                }
                snapshot.phase = PollPhase::Fetching;
                true
            });
        }
        sequence
    }

    /// Publish the result of fetch `sequence`.
    ///
    /// Successes replace the data; failures keep it, substituting `fallback`
    /// only when nothing has been loaded yet.
    pub fn apply<F>(
        &self,
        sequence: u64,
        result: GatewayResult<T>,
        fallback: F,
    ) -> ApplyOutcome
    where
        F: FnOnce() -> Option<T>,
    {
        let mut outcome = ApplyOutcome::Stale;
        self.tx.send_if_modified(|snapshot| {
            if self.is_closed() {
                outcome = ApplyOutcome::Closed;
                return false;
            }
            if sequence <= snapshot.applied_sequence {
                return false;
            }
            let mut next = match result {
                Ok(data) => ViewSnapshot {
                    phase: PollPhase::Ready,
                    data: Some(Arc::new(data)),
                    connected: true,
                    last_updated: Some(Utc::now()),
                    last_error: None,
                    using_fallback: false,
                    applied_sequence: sequence,
                },
                Err(err) => degrade(snapshot, sequence, &err, fallback),
            };
            if sequence < self.next_sequence.load(Ordering::SeqCst) {
                next.phase = PollPhase::Fetching;
            }
            *snapshot = next;
            outcome = ApplyOutcome::Applied;
            true
        });
        outcome
    }

    /// Stop accepting results.
    ///
    /// The flag flips under the channel's write lock, so an `apply` already
    /// publishing finishes first and every later one observes the close.
    pub fn close(&self) {
        self.tx.send_if_modified(|_| {
            self.closed.store(true, Ordering::SeqCst);
            false
        });
    }

    /// `true` once [`ViewStore::close`] ran.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

fn degrade<T, F>(
    previous: &ViewSnapshot<T>,
    sequence: u64,
    err: &GatewayError,
    fallback: F,
) -> ViewSnapshot<T>
where
    F: FnOnce() -> Option<T>,
{
    let (data, using_fallback) = match &previous.data {
        Some(data) => (Some(Arc::clone(data)), previous.using_fallback),
        None => match fallback() {
            Some(data) => (Some(Arc::new(data)), true),
            None => (None, false),
        },
    };
    ViewSnapshot {
        phase: PollPhase::Degraded,
        data,
        connected: false,
        last_updated: previous.last_updated,
        last_error: Some(err.detail()),
        using_fallback,
        applied_sequence: sequence,
    }
}

/// Run one fetch for `source` and publish the result into `store`.
pub async fn fetch_cycle<S: ViewSource>(source: &S, store: &ViewStore<S::Output>) -> ApplyOutcome {
    let sequence = store.begin();
    debug!(view = source.name(), sequence, "fetch started");
    let result = source.fetch().await;
    let failure = result.as_ref().err().map(GatewayError::detail);
    let outcome = store.apply(sequence, result, || source.fallback());

    match (outcome, failure) {
        (ApplyOutcome::Applied, None) => {
            debug!(view = source.name(), sequence, "view refreshed");
        }
        (ApplyOutcome::Applied, Some(error)) => {
            warn!(view = source.name(), sequence, error = %error, "view degraded");
        }
        (ApplyOutcome::Stale, _) => {
            debug!(view = source.name(), sequence, "discarded stale result");
        }
        (ApplyOutcome::Closed, _) => {
            debug!(view = source.name(), sequence, "discarded result after teardown");
        }
    }
    outcome
}

/// Spawns and owns periodic refresh loops.
pub struct PollingController;

impl PollingController {
    /// Start polling `source` every `interval`, beginning immediately.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn<S: ViewSource>(source: S, interval: Duration) -> PollHandle<S> {
        let source = Arc::new(source);
        let store = Arc::new(ViewStore::new(source.name()));
        let refresh = Arc::new(Notify::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            view = source.name(),
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "polling started"
        );
        let task = tokio::spawn(run_loop(
            Arc::clone(&source),
            Arc::clone(&store),
            interval,
            Arc::clone(&refresh),
            shutdown_rx,
        ));

        PollHandle {
            source,
            store,
            refresh,
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

async fn run_loop<S: ViewSource>(
    source: Arc<S>,
    store: Arc<ViewStore<S::Output>>,
    interval: Duration,
    refresh: Arc<Notify>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let cycle = spawn_cycle(Arc::clone(&source), Arc::clone(&store));
        tokio::select! {
            _ = cycle => {}
            _ = shutdown.changed() => break,
        }

        tokio::select! {
            () = sleep(interval) => {}
            () = refresh.notified() => {
                debug!(view = source.name(), "manual refresh requested");
            }
            _ = shutdown.changed() => break,
        }
    }
    debug!(view = source.name(), "polling loop exited");
}

fn spawn_cycle<S: ViewSource>(source: Arc<S>, store: Arc<ViewStore<S::Output>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        fetch_cycle(source.as_ref(), store.as_ref()).await;
    })
}

/// Lifecycle handle for one polled view. Dropping it stops the loop.
pub struct PollHandle<S: ViewSource> {
    source: Arc<S>,
    store: Arc<ViewStore<S::Output>>,
    refresh: Arc<Notify>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl<S: ViewSource> PollHandle<S> {
    /// View label.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.source.name()
    }

    /// Receiver notified on every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot<S::Output>> {
        self.store.subscribe()
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot<S::Output> {
        self.store.snapshot()
    }

    /// Cut the current wait short; the loop fetches as soon as its in-flight
    /// cycle settles.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Fetch immediately, alongside any scheduled cycle. The sequence guard
    /// keeps whichever result was requested last.
    pub fn fetch_now(&self) -> JoinHandle<()> {
        spawn_cycle(Arc::clone(&self.source), Arc::clone(&self.store))
    }

    /// Stop the loop and wait for it to exit. Pending results are discarded.
    pub async fn shutdown(mut self) {
        self.store.close();
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
        {
            warn!(view = self.source.name(), error = %err, "polling task ended abnormally");
        }
        info!(view = self.source.name(), "polling stopped");
    }
}

impl<S: ViewSource> Drop for PollHandle<S> {
    fn drop(&mut self) {
        self.store.close();
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
