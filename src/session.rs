//! Per-connection control session.
//!
//! A session owns everything whose lifetime matches one connection to the
//! remote: the active application, the volume latch, the target register and
//! the sync worker. It is built when the port appears, drains hardware
//! events until the port goes away, and tears everything down so the next
//! connection starts from scratch.

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError};
use log::{debug, info, warn};

use crate::actuator::MediaActuator;
use crate::config::Settings;
use crate::latch::{LatchDecision, VolumeLatch};
use crate::midi::{dial_to_percent, RemoteEvent};
use crate::state::{StatusBoard, TargetVolume};
use crate::sync::{spawn_sync_worker, SyncWorker, SyncWorkerHandle};

pub struct ControlSession {
    app: String,
    latch: VolumeLatch,
    target: TargetVolume,
    actuator: Arc<dyn MediaActuator>,
    board: StatusBoard,
    worker: Option<SyncWorkerHandle>,
    join_timeout: Duration,
}

impl ControlSession {
    /// Builds the per-connection context: picks the active application,
    /// samples its volume as the latch reference and starts a sync worker.
    pub fn begin(
        actuator: Arc<dyn MediaActuator>,
        settings: &Settings,
        board: StatusBoard,
    ) -> Self {
        let (app, reference) = select_active_app(actuator.as_ref(), &settings.apps);
        match reference {
            Some(volume) => info!(
                "Controlling {} (volume {}%, latch tolerance {}%)",
                app, volume, settings.latch_tolerance
            ),
            None => warn!(
                "Controlling {} with no readable volume; latch engages on first movement",
                app
            ),
        }

        board.set_connected(reference);

        let target = TargetVolume::new();
        let worker = spawn_sync_worker(SyncWorker::new(
            Arc::clone(&actuator),
            app.clone(),
            target.clone(),
            board.clone(),
            settings.sync_tuning(),
        ));

        Self {
            latch: VolumeLatch::new(reference, settings.latch_tolerance),
            app,
            target,
            actuator,
            board,
            worker: Some(worker),
            join_timeout: settings.worker_join_timeout(),
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn is_latched(&self) -> bool {
        self.latch.is_latched()
    }

    /// Handles one hardware event. The dial path must stay non-blocking: it
    /// only feeds the latch and overwrites the target register.
    pub fn handle_event(&mut self, event: RemoteEvent) {
        match event {
            RemoteEvent::Dial { value, .. } => {
                let percent = dial_to_percent(value);
                let decision = self.latch.observe(percent);
                if decision == LatchDecision::Engaged {
                    self.board.set_latched();
                }
                if decision.passes() {
                    self.target.store(percent);
                    self.board.set_target(percent);
                }
            }
            RemoteEvent::Button { note } => {
                debug!("Play/pause trigger (note {})", note);
                if let Err(e) = self.actuator.toggle_play_pause(&self.app) {
                    warn!("Play/pause toggle failed: {}", e);
                }
            }
        }
    }

    /// Drains events until the stream closes or `still_present` reports the
    /// port gone. Presence is only probed after a quiet `poll_interval`;
    /// incoming events are proof of liveness by themselves.
    pub fn run<F>(
        &mut self,
        events: &Receiver<RemoteEvent>,
        poll_interval: Duration,
        still_present: F,
    ) where
        F: Fn() -> bool,
    {
        loop {
            match events.recv_timeout(poll_interval) {
                Ok(event) => self.handle_event(event),
                Err(RecvTimeoutError::Timeout) => {
                    if !still_present() {
                        info!("Port for {} disappeared; ending session", self.app);
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Event stream closed; ending session");
                    break;
                }
            }
        }
    }

    /// Tears the session down: stops the worker with a bounded join and
    /// clears the status board. Latch and register die with the session.
    pub fn end(mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop(self.join_timeout);
        }
        self.board.set_disconnected();
    }
}

/// Picks the application the session will drive: the first configured app
/// with a readable volume wins; with none readable, the first configured app
/// is driven blind.
fn select_active_app(actuator: &dyn MediaActuator, apps: &[String]) -> (String, Option<u8>) {
    for app in apps {
        if let Some(volume) = actuator.get_volume(app) {
            return (app.clone(), Some(volume));
        }
        debug!("No volume reading from {}", app);
    }

    let fallback = apps
        .first()
        .cloned()
        .unwrap_or_else(|| "Spotify".to_string());
    (fallback, None)
}
