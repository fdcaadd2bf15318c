//! System media-key backend.
//!
//! Synthesizes the keyboard play/pause key instead of talking to a specific
//! application, so it works with whatever has media focus but can neither
//! read nor set an absolute volume.

use std::process::Command;

use super::{ActuatorError, MediaActuator, Result};

#[derive(Default)]
pub struct MediaKeyActuator;

impl MediaKeyActuator {
    pub fn new() -> Self {
        Self
    }
}

impl MediaActuator for MediaKeyActuator {
    fn name(&self) -> &str {
        "MediaKeys"
    }

    fn is_available(&self, _app: &str) -> bool {
        // Key events are system-wide; availability only depends on the tool.
        Command::new("xdotool")
            .arg("version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn get_volume(&self, _app: &str) -> Option<u8> {
        None
    }

    fn set_volume(&self, _app: &str, _percent: u8) -> Result<()> {
        Err(ActuatorError::Unsupported(
            "media keys cannot set an absolute volume",
        ))
    }

    fn toggle_play_pause(&self, _app: &str) -> Result<()> {
        let status = Command::new("xdotool")
            .args(["key", "XF86AudioPlay"])
            .status()
            .map_err(|e| ActuatorError::Failed(format!("xdotool failed to launch: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(ActuatorError::Failed(format!(
                "xdotool exited with {}",
                status
            )))
        }
    }
}
