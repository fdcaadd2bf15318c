//! Recording actuator used by the test suites.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use super::{ActuatorError, MediaActuator, Result};

/// In-memory stand-in for a media application. Reports a scripted volume,
/// records every call, and can be told to fail or block upcoming set-volume
/// calls.
#[derive(Default)]
pub struct MockActuator {
    volume: Mutex<Option<u8>>,
    offline: AtomicBool,
    set_calls: Mutex<Vec<u8>>,
    set_attempts: AtomicUsize,
    toggles: AtomicUsize,
    set_failures: Mutex<VecDeque<ActuatorError>>,
    set_delay: Mutex<Option<Duration>>,
}

impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock whose application already sits at the given volume.
    pub fn with_volume(percent: u8) -> Self {
        let mock = Self::default();
        mock.set_reported_volume(Some(percent));
        mock
    }

    /// Mock whose set-volume calls block for `delay` before completing,
    /// imitating a wedged scripting bridge.
    pub fn with_set_delay(delay: Duration) -> Self {
        let mock = Self::default();
        if let Ok(mut slot) = mock.set_delay.lock() {
            *slot = Some(delay);
        }
        mock
    }

    pub fn set_reported_volume(&self, percent: Option<u8>) {
        if let Ok(mut volume) = self.volume.lock() {
            *volume = percent;
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Queues an error for the next set-volume call; calls after the queue
    /// drains succeed again.
    pub fn push_set_failure(&self, error: ActuatorError) {
        if let Ok(mut failures) = self.set_failures.lock() {
            failures.push_back(error);
        }
    }

    /// Volumes applied by successful set-volume calls, in order.
    pub fn set_calls(&self) -> Vec<u8> {
        self.set_calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Set-volume invocations, including ones that failed.
    pub fn set_attempts(&self) -> usize {
        self.set_attempts.load(Ordering::SeqCst)
    }

    pub fn toggle_count(&self) -> usize {
        self.toggles.load(Ordering::SeqCst)
    }
}

impl MediaActuator for MockActuator {
    fn name(&self) -> &str {
        "Mock"
    }

    fn is_available(&self, _app: &str) -> bool {
        !self.offline.load(Ordering::SeqCst)
    }

    fn get_volume(&self, _app: &str) -> Option<u8> {
        self.volume.lock().ok().and_then(|volume| *volume)
    }

    fn set_volume(&self, _app: &str, percent: u8) -> Result<()> {
        self.set_attempts.fetch_add(1, Ordering::SeqCst);

        // Copy the delay out so a blocked call does not hold the lock.
        let delay = self.set_delay.lock().ok().and_then(|slot| *slot);
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        if let Some(error) = self
            .set_failures
            .lock()
            .ok()
            .and_then(|mut failures| failures.pop_front())
        {
            return Err(error);
        }

        if let Ok(mut calls) = self.set_calls.lock() {
            calls.push(percent);
        }
        self.set_reported_volume(Some(percent));
        Ok(())
    }

    fn toggle_play_pause(&self, _app: &str) -> Result<()> {
        self.toggles.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
