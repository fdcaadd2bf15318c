//! Rate-limited volume synchronization.
//!
//! The dial can emit dozens of readings per second while it turns; volume
//! APIs tolerate a handful of requests per second at best. The sync worker
//! decouples the two sides: the input path only overwrites the
//! [`TargetVolume`] slot, and the worker drains the slot at a bounded rate,
//! backing off when the actuator signals a request-rate ceiling. Only the
//! newest position is ever applied; everything in between is coalesced away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::actuator::{ActuatorError, MediaActuator};
use crate::state::{StatusBoard, TargetVolume};

/// Timing knobs for the worker, kept separate from [`SyncWorker`] so tests
/// can tighten them without touching settings plumbing.
#[derive(Debug, Clone, Copy)]
pub struct SyncTuning {
    /// Minimum spacing between two successful set-volume calls.
    pub interval: Duration,
    /// Cooldown entered when the actuator reports rate limiting.
    pub backoff: Duration,
    /// Sleep quantum of the worker loop; bounds shutdown latency.
    pub quantum: Duration,
}

impl Default for SyncTuning {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            backoff: Duration::from_secs(10),
            quantum: Duration::from_millis(50),
        }
    }
}

/// What a single worker cycle did. Returned by [`SyncWorker::run_cycle`] so
/// tests can drive the worker with explicit clock values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing to do: no target yet, or the target is already applied.
    Idle,
    /// Inside the minimum sync interval.
    Throttled,
    /// Inside a rate-limit cooldown window.
    CoolingDown,
    /// Target applied to the application.
    Applied(u8),
    /// Actuator signalled rate limiting; a cooldown was started and the
    /// target kept for retry.
    RateLimited,
    /// Actuator failed; the target is kept and retried next eligible cycle.
    Failed,
}

/// Drains the target-volume register into the actuator.
///
/// All sync bookkeeping (last applied volume, last sync time, cooldown
/// deadline) lives here and is owned by the worker thread alone; the rest of
/// the daemon communicates through the register and the status board.
pub struct SyncWorker {
    actuator: Arc<dyn MediaActuator>,
    app: String,
    target: TargetVolume,
    board: StatusBoard,
    tuning: SyncTuning,
    last_synced: Option<u8>,
    last_sync_at: Option<Instant>,
    rate_limited_until: Option<Instant>,
}

impl SyncWorker {
    pub fn new(
        actuator: Arc<dyn MediaActuator>,
        app: impl Into<String>,
        target: TargetVolume,
        board: StatusBoard,
        tuning: SyncTuning,
    ) -> Self {
        Self {
            actuator,
            app: app.into(),
            target,
            board,
            tuning,
            last_synced: None,
            last_sync_at: None,
            rate_limited_until: None,
        }
    }

    /// Runs one sync cycle against the clock value `now`.
    pub fn run_cycle(&mut self, now: Instant) -> SyncOutcome {
        if let Some(until) = self.rate_limited_until {
            if now < until {
                return SyncOutcome::CoolingDown;
            }
            self.rate_limited_until = None;
            self.board.set_cooling(false);
            info!("Rate-limit cooldown over; resuming sync");
        }

        let pending = match self.target.load() {
            Some(volume) if Some(volume) != self.last_synced => volume,
            _ => return SyncOutcome::Idle,
        };

        if let Some(last) = self.last_sync_at {
            if now.duration_since(last) < self.tuning.interval {
                return SyncOutcome::Throttled;
            }
        }

        match self.actuator.set_volume(&self.app, pending) {
            Ok(()) => {
                match self.last_synced {
                    Some(previous) => info!("Synced volume {}% -> {}%", previous, pending),
                    None => info!("Synced volume to {}%", pending),
                }
                self.last_synced = Some(pending);
                self.last_sync_at = Some(now);
                self.board.set_synced(pending);
                SyncOutcome::Applied(pending)
            }
            Err(ActuatorError::RateLimited) => {
                warn!(
                    "Rate limited while syncing {}%; backing off for {:?}",
                    pending, self.tuning.backoff
                );
                self.rate_limited_until = Some(now + self.tuning.backoff);
                self.board.set_cooling(true);
                SyncOutcome::RateLimited
            }
            Err(e) => {
                error!("Failed to set volume to {}%: {}", pending, e);
                SyncOutcome::Failed
            }
        }
    }
}

/// Handle to a running sync worker thread.
pub struct SyncWorkerHandle {
    running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

/// Spawns the worker loop: sleep one quantum, run one cycle, repeat until
/// stopped. The short quantum keeps shutdown prompt without tightening the
/// sync interval itself.
pub fn spawn_sync_worker(mut worker: SyncWorker) -> SyncWorkerHandle {
    let running = Arc::new(AtomicBool::new(true));
    let thread_running = Arc::clone(&running);
    let quantum = worker.tuning.quantum;

    let thread_handle = thread::spawn(move || {
        info!(
            "Sync worker started for {} (interval {:?})",
            worker.app, worker.tuning.interval
        );
        while thread_running.load(Ordering::SeqCst) {
            thread::sleep(quantum);
            worker.run_cycle(Instant::now());
        }
        info!("Sync worker stopped");
    });

    SyncWorkerHandle {
        running,
        thread_handle: Some(thread_handle),
    }
}

impl SyncWorkerHandle {
    /// Signals the worker to stop and waits up to `timeout` for it to exit.
    /// Returns false if the thread had to be abandoned; teardown continues
    /// either way so a wedged actuator call cannot stall reconnection.
    pub fn stop(mut self, timeout: Duration) -> bool {
        self.running.store(false, Ordering::SeqCst);

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            match &self.thread_handle {
                Some(handle) if !handle.is_finished() => {
                    thread::sleep(Duration::from_millis(10))
                }
                _ => break,
            }
        }

        match self.thread_handle.take() {
            Some(handle) if handle.is_finished() => {
                let _ = handle.join();
                true
            }
            Some(_) => {
                warn!("Sync worker did not stop within {:?}; detaching", timeout);
                false
            }
            None => true,
        }
    }
}
