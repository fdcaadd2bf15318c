//! Escalating throttle/debounce guard.
//!
//! Single-threaded alternative to the sync worker for embedders that cannot
//! spare a thread. Calls arriving faster than the current throttle interval
//! are parked and released once a debounce quiet period passes; the interval
//! itself escalates over one continuous interaction and resets when the user
//! pauses long enough to start a new one. The daemon itself runs the worker,
//! which supersedes this guard on the hot path.

use std::time::{Duration, Instant};

/// Timing knobs for [`ThrottleGuard`].
#[derive(Debug, Clone, Copy)]
pub struct ThrottleTuning {
    /// Quiet period a parked call waits before it fires.
    pub debounce: Duration,
    /// Gap after which the next call counts as a new interaction.
    pub first_call_threshold: Duration,
    /// Throttle interval at the start of each interaction.
    pub initial_interval: Duration,
    /// Ceiling the interval escalates toward within one interaction.
    pub max_interval: Duration,
    /// Multiplier applied to the interval after each throttled pass.
    pub backoff_factor: f64,
}

impl Default for ThrottleTuning {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            first_call_threshold: Duration::from_millis(500),
            initial_interval: Duration::from_millis(50),
            max_interval: Duration::from_millis(500),
            backoff_factor: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Instant,
    value: u8,
}

/// Throttle with escalating interval and trailing-edge debounce.
///
/// Unlike the worker, the guard never schedules its own wakeups: the caller
/// feeds it a clock through [`submit`](Self::submit) and polls parked values
/// with [`poll_due`](Self::poll_due).
pub struct ThrottleGuard {
    tuning: ThrottleTuning,
    current_interval: Duration,
    last_call: Option<Instant>,
    last_interaction: Option<Instant>,
    pending: Option<Pending>,
}

impl ThrottleGuard {
    pub fn new(tuning: ThrottleTuning) -> Self {
        Self {
            current_interval: tuning.initial_interval,
            tuning,
            last_call: None,
            last_interaction: None,
            pending: None,
        }
    }

    /// Current throttle interval; escalates within an interaction.
    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Submits a value at time `now`. `Some` means the caller should apply
    /// the value immediately; `None` means it was parked behind the debounce
    /// window, superseding any previously parked value.
    pub fn submit(&mut self, value: u8, now: Instant) -> Option<u8> {
        // Newest submission always cancels whatever was parked.
        self.pending = None;

        let new_interaction = match self.last_interaction {
            Some(last) => now.duration_since(last) > self.tuning.first_call_threshold,
            None => true,
        };

        if new_interaction {
            self.current_interval = self.tuning.initial_interval;
            self.record_execution(now);
            return Some(value);
        }

        let interval_elapsed = match self.last_call {
            Some(last) => now.duration_since(last) > self.current_interval,
            None => true,
        };

        if interval_elapsed {
            self.record_execution(now);
            self.escalate();
            Some(value)
        } else {
            self.pending = Some(Pending {
                due: now + self.tuning.debounce,
                value,
            });
            None
        }
    }

    /// Releases the parked value once its debounce window has passed.
    pub fn poll_due(&mut self, now: Instant) -> Option<u8> {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                self.record_execution(now);
                Some(pending.value)
            }
            _ => None,
        }
    }

    fn record_execution(&mut self, now: Instant) {
        self.last_call = Some(now);
        self.last_interaction = Some(now);
    }

    fn escalate(&mut self) {
        let scaled = self.current_interval.mul_f64(self.tuning.backoff_factor);
        self.current_interval = scaled.min(self.tuning.max_interval);
    }
}
