//! Debounced snapshot persistence for one quote.
//!
//! Two background tasks cooperate:
//!
//! - the **scheduler** receives change notifications, drops snapshots equal
//!   to the last dispatched one, and restarts the delay on every new
//!   change. When the delay elapses it dispatches only the latest snapshot.
//! - the **saver** runs dispatched saves one at a time, in dispatch order,
//!   so an older snapshot can never land after a newer one.
//!
//! The last-dispatched fingerprint is recorded at dispatch time, before the
//! save resolves. A change made while a save is in flight therefore starts
//! a fresh debounce cycle instead of being folded into the in-flight one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::autosave::SaveStatus;
use crate::config::AutosaveConfig;
use crate::db::QuoteStore;
use crate::models::{QuoteId, QuoteSnapshot};

/// Idle wake-up used when no save is scheduled.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

enum Command {
    Changed(QuoteSnapshot),
    Flush(oneshot::Sender<SaveStatus>),
    CancelPending,
}

enum Job {
    Save {
        generation: u64,
        snapshot: QuoteSnapshot,
        fingerprint: String,
    },
    /// Completes once every job queued before it has finished.
    Barrier(oneshot::Sender<SaveStatus>),
}

/// Handle to a running autosave pipeline for one quote.
///
/// Must be created inside a Tokio runtime. Dropping the handle tears the
/// pipeline down: a pending delay is cancelled, an in-flight save runs to
/// completion but its result is discarded.
pub struct AutosaveCoordinator {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<SaveStatus>,
    quote_id: watch::Receiver<Option<QuoteId>>,
    enabled: Arc<AtomicBool>,
    shutdown: CancellationToken,
}

impl AutosaveCoordinator {
    /// Starts the scheduler and saver tasks.
    ///
    /// `quote_id` is the identity of an already persisted quote, or `None`
    /// for a new quote; the first successful save then assigns one.
    pub fn spawn(
        store: Arc<dyn QuoteStore>,
        quote_id: Option<QuoteId>,
        config: &AutosaveConfig,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
        let (failures_tx, failures_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SaveStatus::Idle);
        let (id_tx, id_rx) = watch::channel(quote_id);
        let enabled = Arc::new(AtomicBool::new(config.enabled));
        let latest_generation = Arc::new(AtomicU64::new(0));
        let shutdown = CancellationToken::new();

        let scheduler = Scheduler {
            delay: config.delay(),
            enabled: enabled.clone(),
            shutdown: shutdown.clone(),
            commands: commands_rx,
            failures: failures_rx,
            jobs: jobs_tx,
            status: status_tx.clone(),
            latest_generation: latest_generation.clone(),
            last_dispatched: None,
            in_flight: None,
            retry: None,
            pending: None,
            deadline: None,
        };

        let saver = Saver {
            store,
            shutdown: shutdown.clone(),
            jobs: jobs_rx,
            failures: failures_tx,
            status: status_tx,
            quote_id: id_tx,
            latest_generation,
        };

        tokio::spawn(scheduler.run());
        tokio::spawn(saver.run());

        Self {
            commands: commands_tx,
            status: status_rx,
            quote_id: id_rx,
            enabled,
            shutdown,
        }
    }

    /// Reports a state change. Cheap; the comparison and scheduling happen
    /// on the scheduler task.
    pub fn notify(
        &self,
        snapshot: QuoteSnapshot,
    ) {
        if !self.is_enabled() {
            return;
        }
        if self.commands.send(Command::Changed(snapshot)).is_err() {
            debug!("autosave scheduler stopped, change ignored");
        }
    }

    /// Dispatches any pending snapshot immediately and waits for every
    /// queued save to finish. Returns the resulting status.
    pub async fn flush(&self) -> SaveStatus {
        let (done_tx, done_rx) = oneshot::channel();
        if self.commands.send(Command::Flush(done_tx)).is_err() {
            return self.status();
        }
        done_rx.await.unwrap_or_else(|_| self.status())
    }

    /// Turns autosave on or off. Turning it off also drops any pending
    /// snapshot; a save already in flight is unaffected.
    pub fn set_enabled(
        &self,
        enabled: bool,
    ) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            let _ = self.commands.send(Command::CancelPending);
        }
        debug!(enabled, "autosave toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// A receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    /// Identity of the quote in the store, once known.
    pub fn quote_id(&self) -> Option<QuoteId> {
        *self.quote_id.borrow()
    }

    /// Stops both tasks. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for AutosaveCoordinator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// ── scheduler ──────────────────────────────────────────────────────────────

struct Scheduler {
    delay: Duration,
    enabled: Arc<AtomicBool>,
    shutdown: CancellationToken,
    commands: mpsc::UnboundedReceiver<Command>,
    failures: mpsc::UnboundedReceiver<String>,
    jobs: mpsc::UnboundedSender<Job>,
    status: watch::Sender<SaveStatus>,
    latest_generation: Arc<AtomicU64>,
    last_dispatched: Option<String>,
    /// Snapshot behind `last_dispatched`, kept until its outcome is known.
    in_flight: Option<QuoteSnapshot>,
    /// Latest snapshot whose save failed. An explicit flush sends it again.
    retry: Option<(QuoteSnapshot, String)>,
    pending: Option<(QuoteSnapshot, String)>,
    deadline: Option<Instant>,
}

impl Scheduler {
    async fn run(mut self) {
        debug!("autosave scheduler started");

        loop {
            let sleep_until = self.deadline.unwrap_or_else(|| Instant::now() + IDLE_WAIT);

            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    if self.pending.is_some() {
                        debug!("autosave torn down with a pending change, dropping it");
                    }
                    break;
                }

                // Failures are drained before commands so a flush sent after
                // a failed save sees it.
                Some(fingerprint) = self.failures.recv() => self.on_failure(fingerprint),

                _ = tokio::time::sleep_until(sleep_until), if self.deadline.is_some() => {
                    self.deadline = None;
                    self.dispatch(None);
                }

                command = self.commands.recv() => match command {
                    Some(Command::Changed(snapshot)) => self.on_change(snapshot),
                    Some(Command::Flush(done)) => {
                        self.deadline = None;
                        self.dispatch(Some(done));
                    }
                    Some(Command::CancelPending) => {
                        self.pending = None;
                        self.retry = None;
                        self.deadline = None;
                    }
                    None => break,
                },
            }
        }

        debug!("autosave scheduler stopped");
    }

    fn on_change(
        &mut self,
        snapshot: QuoteSnapshot,
    ) {
        if !self.enabled.load(Ordering::SeqCst) {
            return;
        }

        let fingerprint = match snapshot.fingerprint() {
            Ok(fingerprint) => fingerprint,
            Err(error) => {
                warn!(%error, "cannot serialize quote snapshot, change not scheduled");
                return;
            }
        };

        if self.last_dispatched.as_deref() == Some(fingerprint.as_str()) {
            // The latest state is already saved or being saved; anything
            // pending in between is stale.
            self.pending = None;
            self.deadline = None;
            return;
        }

        self.retry = None;
        self.pending = Some((snapshot, fingerprint));
        self.deadline = Some(Instant::now() + self.delay);
    }

    fn on_failure(
        &mut self,
        fingerprint: String,
    ) {
        // Only the newest dispatch matters; an older failure was superseded.
        if self.last_dispatched.as_deref() != Some(fingerprint.as_str()) {
            return;
        }
        self.last_dispatched = None;
        if let Some(snapshot) = self.in_flight.take() {
            self.retry = Some((snapshot, fingerprint));
        }
    }

    fn dispatch(
        &mut self,
        done: Option<oneshot::Sender<SaveStatus>>,
    ) {
        let mut pending = self.pending.take();
        if pending.is_none() && done.is_some() {
            pending = self.retry.take();
        }

        if !self.enabled.load(Ordering::SeqCst) {
            if pending.is_some() {
                debug!("autosave disabled before the delay elapsed, pending change dropped");
            }
        } else if let Some((snapshot, fingerprint)) = pending {
            let generation = self.latest_generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.last_dispatched = Some(fingerprint.clone());
            self.in_flight = Some(snapshot.clone());
            self.retry = None;
            self.status.send_replace(SaveStatus::Saving);
            debug!(generation, "dispatching quote save");
            let _ = self.jobs.send(Job::Save {
                generation,
                snapshot,
                fingerprint,
            });
        }

        if let Some(done) = done {
            let _ = self.jobs.send(Job::Barrier(done));
        }
    }
}

// ── saver ──────────────────────────────────────────────────────────────────

struct Saver {
    store: Arc<dyn QuoteStore>,
    shutdown: CancellationToken,
    jobs: mpsc::UnboundedReceiver<Job>,
    failures: mpsc::UnboundedSender<String>,
    status: watch::Sender<SaveStatus>,
    quote_id: watch::Sender<Option<QuoteId>>,
    latest_generation: Arc<AtomicU64>,
}

impl Saver {
    async fn run(mut self) {
        loop {
            let job = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                job = self.jobs.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };

            match job {
                Job::Save {
                    generation,
                    snapshot,
                    fingerprint,
                } => {
                    let id = *self.quote_id.borrow();
                    // Not raced against shutdown: an in-flight save always
                    // completes, only its outcome is dropped.
                    let result = self.store.save_quote(id, &snapshot).await;

                    if self.shutdown.is_cancelled() {
                        debug!(generation, "save finished after teardown, result ignored");
                        break;
                    }

                    let is_latest = generation == self.latest_generation.load(Ordering::SeqCst);
                    match result {
                        Ok(saved_id) => {
                            if id.is_none() {
                                info!(quote = %saved_id, "quote persisted for the first time");
                            }
                            self.quote_id.send_replace(Some(saved_id));
                            if is_latest {
                                self.status.send_replace(SaveStatus::Saved);
                            }
                            debug!(generation, quote = %saved_id, "quote saved");
                        }
                        Err(error) => {
                            warn!(generation, %error, "quote save failed");
                            let _ = self.failures.send(fingerprint);
                            if is_latest {
                                self.status.send_replace(SaveStatus::Error(error.to_string()));
                            }
                        }
                    }
                }
                Job::Barrier(done) => {
                    let _ = done.send(self.status.borrow().clone());
                }
            }
        }
    }
}
