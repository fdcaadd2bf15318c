//! Scripted event source for tests.

use crossbeam::channel::{unbounded, Receiver, Sender};

use super::RemoteEvent;

/// Test double for [`MidirSource`](super::MidirSource): events pushed here
/// appear on the same channel interface the session drains in production.
/// Dropping the source ends the stream, like a port disappearing.
pub struct MockSource {
    tx: Sender<RemoteEvent>,
    rx: Receiver<RemoteEvent>,
}

impl MockSource {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn push(&self, event: RemoteEvent) {
        let _ = self.tx.send(event);
    }

    pub fn push_dial(&self, value: u8) {
        self.push(RemoteEvent::Dial {
            controller: 1,
            value,
        });
    }

    pub fn push_button(&self) {
        self.push(RemoteEvent::Button { note: 60 });
    }

    pub fn events(&self) -> &Receiver<RemoteEvent> {
        &self.rx
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}
