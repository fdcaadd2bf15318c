//! Real hardware connection via midir.

use crossbeam::channel::{unbounded, Receiver};
use log::{debug, info, warn};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

use super::{parse_remote_event, MidiError, RemoteEvent, Result};

/// Vendor SysEx greeting some remotes expect before they report dial motion.
const SYSEX_HANDSHAKE: [u8; 9] = [0xF0, 0x00, 0x20, 0x76, 0x02, 0x00, 0x02, 0x00, 0xF7];

/// An open connection to the remote's port pair.
///
/// The input callback does nothing but parse and forward into the channel;
/// all real work happens on the session thread that drains [`events`].
///
/// [`events`]: MidirSource::events
pub struct MidirSource {
    // Held open for the life of the session; dropping closes the port.
    #[allow(dead_code)]
    input: MidiInputConnection<()>,
    #[allow(dead_code)]
    output: MidiOutputConnection,
    events: Receiver<RemoteEvent>,
}

impl MidirSource {
    /// Lists input port names for `--list-ports` and the interactive picker.
    pub fn list_input_ports() -> Result<Vec<String>> {
        let mut midi_in =
            MidiInput::new("orthoctl-list").map_err(|e| MidiError::Init(e.to_string()))?;
        midi_in.ignore(Ignore::None);

        let mut names = Vec::new();
        for port in midi_in.ports() {
            match midi_in.port_name(&port) {
                Ok(name) => names.push(name),
                Err(e) => debug!("Skipping port with unreadable name: {}", e),
            }
        }
        Ok(names)
    }

    /// True while a port matching `name` exists on both the input and output
    /// side. The remote exposes both; losing either means it is gone.
    pub fn is_present(name: &str) -> bool {
        let input_present = MidiInput::new("orthoctl-probe")
            .map(|midi_in| {
                midi_in
                    .ports()
                    .iter()
                    .any(|p| midi_in.port_name(p).unwrap_or_default().contains(name))
            })
            .unwrap_or(false);

        let output_present = MidiOutput::new("orthoctl-probe")
            .map(|midi_out| {
                midi_out
                    .ports()
                    .iter()
                    .any(|p| midi_out.port_name(p).unwrap_or_default().contains(name))
            })
            .unwrap_or(false);

        input_present && output_present
    }

    /// Opens the named port pair and starts forwarding parsed events.
    pub fn connect(name: &str, send_handshake: bool) -> Result<Self> {
        let mut midi_in =
            MidiInput::new("orthoctl-in").map_err(|e| MidiError::Init(e.to_string()))?;
        midi_in.ignore(Ignore::None);

        let in_ports = midi_in.ports();
        let in_port = in_ports
            .iter()
            .find(|p| midi_in.port_name(p).unwrap_or_default().contains(name))
            .ok_or_else(|| MidiError::PortNotFound(name.to_string()))?;

        let (tx, rx) = unbounded();
        let input = midi_in
            .connect(
                in_port,
                "orthoctl-input",
                move |_stamp, message, _| {
                    if let Some(event) = parse_remote_event(message) {
                        let _ = tx.send(event);
                    }
                },
                (),
            )
            .map_err(|e| MidiError::Connect(e.to_string()))?;

        let midi_out =
            MidiOutput::new("orthoctl-out").map_err(|e| MidiError::Init(e.to_string()))?;
        let out_ports = midi_out.ports();
        let out_port = out_ports
            .iter()
            .find(|p| midi_out.port_name(p).unwrap_or_default().contains(name))
            .ok_or_else(|| MidiError::PortNotFound(name.to_string()))?;
        let mut output = midi_out
            .connect(out_port, "orthoctl-output")
            .map_err(|e| MidiError::Connect(e.to_string()))?;

        if send_handshake {
            match output.send(&SYSEX_HANDSHAKE) {
                Ok(()) => info!("SysEx handshake sent to '{}'", name),
                Err(e) => warn!("Failed to send SysEx handshake: {}", e),
            }
        }

        info!("Connected to '{}'", name);
        Ok(MidirSource {
            input,
            output,
            events: rx,
        })
    }

    pub fn events(&self) -> &Receiver<RemoteEvent> {
        &self.events
    }
}
