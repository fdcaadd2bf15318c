//! AppleScript bridge for scriptable macOS media players.

use std::process::Command;

use log::{debug, warn};

use super::{ActuatorError, MediaActuator, Result};

/// Applications that expose a `sound volume` property and `playpause`.
const SCRIPTABLE_APPS: &[&str] = &["Spotify", "Music"];

/// Drives a media player through `osascript`. Stateless; every call shells
/// out, so availability degrades gracefully on systems without the binary.
#[derive(Default)]
pub struct OsaScriptActuator;

impl OsaScriptActuator {
    pub fn new() -> Self {
        Self
    }

    fn run_script(script: &str) -> Result<String> {
        let output = Command::new("osascript")
            .args(["-e", script])
            .output()
            .map_err(|e| ActuatorError::Failed(format!("osascript failed to launch: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ActuatorError::Failed(format!(
                "osascript exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn is_running(app: &str) -> bool {
        let script = format!(
            r#"tell application "System Events" to exists (application process "{}")"#,
            app
        );
        matches!(Self::run_script(&script).as_deref(), Ok("true"))
    }
}

impl MediaActuator for OsaScriptActuator {
    fn name(&self) -> &str {
        "AppleScript"
    }

    fn is_available(&self, app: &str) -> bool {
        SCRIPTABLE_APPS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(app))
            && Self::is_running(app)
    }

    fn get_volume(&self, app: &str) -> Option<u8> {
        let script = format!(r#"tell application "{}" to get sound volume"#, app);
        match Self::run_script(&script) {
            Ok(reply) => match reply.parse::<u8>() {
                Ok(volume) => Some(volume.min(100)),
                Err(_) => {
                    warn!("Unparseable volume reply from {}: {:?}", app, reply);
                    None
                }
            },
            Err(e) => {
                debug!("Could not read {} volume: {}", app, e);
                None
            }
        }
    }

    fn set_volume(&self, app: &str, percent: u8) -> Result<()> {
        let script = format!(
            r#"tell application "{}" to set sound volume to {}"#,
            app, percent
        );
        Self::run_script(&script).map(|_| ())
    }

    fn toggle_play_pause(&self, app: &str) -> Result<()> {
        let script = format!(r#"tell application "{}" to playpause"#, app);
        Self::run_script(&script).map(|_| ())
    }
}
