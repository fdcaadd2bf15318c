//! Actuator backends: how volume and playback commands reach an application.
//!
//! Backends differ in capability. Scripting bridges can read and set an
//! absolute volume for one application; the system media-key backend can only
//! toggle playback. The trait keeps those edges optional, and
//! [`ActuatorStack`] composes backends with per-operation fallback.

mod media_keys;
mod mock;
mod osascript;

pub use media_keys::MediaKeyActuator;
pub use mock::MockActuator;
pub use osascript::OsaScriptActuator;

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

/// Custom error type for actuator operations
#[derive(Debug)]
pub enum ActuatorError {
    /// The application's API signalled a request-rate ceiling
    RateLimited,
    /// Backend cannot serve this application right now
    Unavailable(String),
    /// Backend cannot perform this operation at all
    Unsupported(&'static str),
    /// Script failure, I/O error or unparseable reply
    Failed(String),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuatorError::RateLimited => write!(f, "rate limited by the application"),
            ActuatorError::Unavailable(app) => write!(f, "no backend available for {}", app),
            ActuatorError::Unsupported(msg) => write!(f, "operation not supported: {}", msg),
            ActuatorError::Failed(msg) => write!(f, "actuator failure: {}", msg),
        }
    }
}

impl Error for ActuatorError {}

/// Result type for actuator operations
pub type Result<T> = std::result::Result<T, ActuatorError>;

/// Trait defining the interface for media control backends
pub trait MediaActuator: Send + Sync {
    /// Human-readable backend name, used in logs
    fn name(&self) -> &str;

    /// Whether this backend can currently serve the given application
    fn is_available(&self, app: &str) -> bool;

    /// Reads the application's current volume, if this backend can
    fn get_volume(&self, app: &str) -> Option<u8>;

    /// Sets the application's volume as a 0-100 percentage
    fn set_volume(&self, app: &str, percent: u8) -> Result<()>;

    /// Toggles playback for the application
    fn toggle_play_pause(&self, app: &str) -> Result<()>;
}

/// Ordered collection of backends with per-operation fallback.
///
/// A backend that is unavailable or reports an operation as unsupported is
/// skipped; a transient failure is logged and the next backend tried. A
/// rate-limit signal aborts the whole chain so the caller backs off instead
/// of hammering a second endpoint for the same application.
pub struct ActuatorStack {
    backends: Vec<Arc<dyn MediaActuator>>,
}

impl ActuatorStack {
    pub fn new(backends: Vec<Arc<dyn MediaActuator>>) -> Self {
        Self { backends }
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|backend| backend.name()).collect()
    }
}

impl MediaActuator for ActuatorStack {
    fn name(&self) -> &str {
        "Stack"
    }

    fn is_available(&self, app: &str) -> bool {
        self.backends.iter().any(|backend| backend.is_available(app))
    }

    fn get_volume(&self, app: &str) -> Option<u8> {
        for backend in &self.backends {
            if !backend.is_available(app) {
                continue;
            }
            if let Some(volume) = backend.get_volume(app) {
                debug!("{} reports {}% for {}", backend.name(), volume, app);
                return Some(volume);
            }
        }
        None
    }

    fn set_volume(&self, app: &str, percent: u8) -> Result<()> {
        let mut last_failure = None;
        for backend in &self.backends {
            if !backend.is_available(app) {
                continue;
            }
            match backend.set_volume(app, percent) {
                Ok(()) => return Ok(()),
                Err(ActuatorError::RateLimited) => return Err(ActuatorError::RateLimited),
                Err(ActuatorError::Unsupported(msg)) => {
                    debug!("{} skipped: {}", backend.name(), msg);
                }
                Err(e) => {
                    warn!("{} failed to set volume for {}: {}", backend.name(), app, e);
                    last_failure = Some(e);
                }
            }
        }
        Err(last_failure.unwrap_or_else(|| ActuatorError::Unavailable(app.to_string())))
    }

    fn toggle_play_pause(&self, app: &str) -> Result<()> {
        let mut last_failure = None;
        for backend in &self.backends {
            if !backend.is_available(app) {
                continue;
            }
            match backend.toggle_play_pause(app) {
                Ok(()) => {
                    debug!("{} toggled playback for {}", backend.name(), app);
                    return Ok(());
                }
                Err(ActuatorError::RateLimited) => return Err(ActuatorError::RateLimited),
                Err(ActuatorError::Unsupported(msg)) => {
                    debug!("{} skipped: {}", backend.name(), msg);
                }
                Err(e) => {
                    warn!("{} failed to toggle playback for {}: {}", backend.name(), app, e);
                    last_failure = Some(e);
                }
            }
        }
        Err(last_failure.unwrap_or_else(|| ActuatorError::Unavailable(app.to_string())))
    }
}
