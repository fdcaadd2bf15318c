pub mod actuator;
pub mod cli;
pub mod config;
pub mod latch;
pub mod logging;
pub mod midi;
pub mod session;
pub mod state;
pub mod sync;
pub mod throttle;
pub mod ui;

pub use crate::latch::{LatchDecision, VolumeLatch};
pub use crate::session::ControlSession;
pub use crate::state::{Status, StatusBoard, TargetVolume};
pub use crate::sync::{spawn_sync_worker, SyncOutcome, SyncTuning, SyncWorker, SyncWorkerHandle};
pub use crate::throttle::{ThrottleGuard, ThrottleTuning};
