use std::sync::{Arc, Mutex};

use log::debug;

/// Single-slot register holding the most recently requested volume.
///
/// Written by the input path on every latched dial reading, drained by the
/// sync worker. Writes overwrite: only the newest value matters, so the
/// intermediate positions of a fast turn are coalesced away instead of
/// queueing up behind a rate limit.
#[derive(Clone, Default)]
pub struct TargetVolume {
    slot: Arc<Mutex<Option<u8>>>,
}

impl TargetVolume {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the slot with the latest requested volume.
    pub fn store(&self, percent: u8) {
        if let Ok(mut slot) = self.slot.lock() {
            if *slot != Some(percent) {
                debug!("Target volume set to {}%", percent);
            }
            *slot = Some(percent);
        }
    }

    /// Snapshot of the most recent request, if any. Does not consume the
    /// value; the worker tracks what it already applied.
    pub fn load(&self) -> Option<u8> {
        self.slot.lock().ok().and_then(|slot| *slot)
    }
}

/// What the daemon is doing right now, as shown by the status display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub connected: bool,
    pub latched: bool,
    pub reference: Option<u8>,
    pub target: Option<u8>,
    pub last_synced: Option<u8>,
    pub cooling_down: bool,
}

/// Shared board the session and worker threads write to and the display
/// thread reads from.
#[derive(Clone, Default)]
pub struct StatusBoard {
    inner: Arc<Mutex<Status>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Status {
        self.inner.lock().map(|status| *status).unwrap_or_default()
    }

    /// Marks the start of a connection, clearing anything left over from the
    /// previous one.
    pub fn set_connected(&self, reference: Option<u8>) {
        self.update(|status| {
            *status = Status {
                connected: true,
                reference,
                ..Status::default()
            };
        });
    }

    pub fn set_disconnected(&self) {
        self.update(|status| *status = Status::default());
    }

    pub fn set_latched(&self) {
        self.update(|status| status.latched = true);
    }

    pub fn set_target(&self, percent: u8) {
        self.update(|status| status.target = Some(percent));
    }

    pub fn set_synced(&self, percent: u8) {
        self.update(|status| status.last_synced = Some(percent));
    }

    pub fn set_cooling(&self, active: bool) {
        self.update(|status| status.cooling_down = active);
    }

    fn update(&self, f: impl FnOnce(&mut Status)) {
        if let Ok(mut status) = self.inner.lock() {
            f(&mut status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_starts_empty() {
        let target = TargetVolume::new();
        assert_eq!(target.load(), None, "Fresh register should hold no value");
    }

    #[test]
    fn test_register_overwrites() {
        let target = TargetVolume::new();
        target.store(70);
        target.store(71);
        target.store(70);
        assert_eq!(
            target.load(),
            Some(70),
            "Register should hold only the most recent value"
        );
    }

    #[test]
    fn test_register_load_does_not_consume() {
        let target = TargetVolume::new();
        target.store(42);
        assert_eq!(target.load(), Some(42));
        assert_eq!(target.load(), Some(42), "Load should not clear the slot");
    }

    #[test]
    fn test_register_clones_share_slot() {
        let target = TargetVolume::new();
        let other = target.clone();
        target.store(55);
        assert_eq!(
            other.load(),
            Some(55),
            "Clones should observe the same slot"
        );
    }

    #[test]
    fn test_board_connection_cycle_resets_status() {
        let board = StatusBoard::new();
        board.set_connected(Some(40));
        board.set_latched();
        board.set_target(38);
        board.set_synced(38);

        let status = board.snapshot();
        assert!(status.connected && status.latched);
        assert_eq!(status.reference, Some(40));
        assert_eq!(status.last_synced, Some(38));

        board.set_connected(Some(60));
        let status = board.snapshot();
        assert!(!status.latched, "Reconnect should drop the old latch state");
        assert_eq!(status.reference, Some(60));
        assert_eq!(status.target, None);
        assert_eq!(status.last_synced, None);
    }

    #[test]
    fn test_board_disconnect_clears_everything() {
        let board = StatusBoard::new();
        board.set_connected(None);
        board.set_cooling(true);
        board.set_disconnected();
        assert_eq!(board.snapshot(), Status::default());
    }
}
