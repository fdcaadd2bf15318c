//! Hardware event source: wire parsing and dial-to-volume mapping.
//!
//! The remote reports dial motion as Control Change messages (7-bit value)
//! and button presses as Note On messages; everything else on the wire is
//! ignored. Port management lives in [`midir_source`], and tests drive the
//! session through [`mock_source`].

pub mod midir_source;
pub mod mock_source;

pub use midir_source::MidirSource;
pub use mock_source::MockSource;

use std::error::Error;
use std::fmt;

/// Custom error type for MIDI port handling
#[derive(Debug)]
pub enum MidiError {
    /// Error while initializing a MIDI client
    Init(String),
    /// No port matching the configured name
    PortNotFound(String),
    /// Error while connecting to a port
    Connect(String),
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::Init(msg) => write!(f, "MIDI init error: {}", msg),
            MidiError::PortNotFound(name) => write!(f, "MIDI port not found: {}", name),
            MidiError::Connect(msg) => write!(f, "MIDI connection error: {}", msg),
        }
    }
}

impl Error for MidiError {}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// A hardware event the session acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEvent {
    /// Dial movement: absolute 7-bit position 0..=127.
    Dial { controller: u8, value: u8 },
    /// Button press (play/pause trigger).
    Button { note: u8 },
}

/// Parses a raw MIDI message into a remote event, dropping everything the
/// bridge has no use for.
pub fn parse_remote_event(data: &[u8]) -> Option<RemoteEvent> {
    if data.is_empty() {
        return None;
    }

    match data[0] & 0xF0 {
        0xB0 if data.len() >= 3 => Some(RemoteEvent::Dial {
            controller: data[1],
            value: data[2],
        }),
        // Note On with velocity 0 is a release marker, not a press.
        0x90 if data.len() >= 3 && data[2] > 0 => Some(RemoteEvent::Button { note: data[1] }),
        _ => None,
    }
}

/// Maps a 7-bit dial position onto a 0-100 volume percentage, rounding to
/// the nearest point so both endpoints are reachable.
pub fn dial_to_percent(value: u8) -> u8 {
    let clamped = value.min(127);
    (f32::from(clamped) * 100.0 / 127.0).round() as u8
}
