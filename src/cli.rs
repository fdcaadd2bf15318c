use std::path::PathBuf;

use clap::Parser;
use dialoguer::Select;

use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bridge a rotary MIDI remote to desktop media apps")]
pub struct Args {
    /// List available MIDI input ports and exit
    #[arg(long)]
    pub list_ports: bool,

    /// MIDI port of the remote (substring match)
    #[arg(long)]
    pub port: Option<String>,

    /// Media application to control (repeat for a priority list)
    #[arg(long)]
    pub app: Vec<String>,

    /// Latch tolerance in percentage points
    #[arg(long)]
    pub tolerance: Option<u8>,

    /// Send the vendor SysEx greeting after connecting
    #[arg(long)]
    pub sysex: bool,

    /// Log level for the file logger (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Settings file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run without the terminal status display
    #[arg(long)]
    pub no_status: bool,
}

/// Applies command-line flags on top of loaded settings; flags win over
/// every other layer.
pub fn apply_overrides(args: &Args, settings: &mut Settings) {
    if let Some(port) = &args.port {
        settings.port = Some(port.clone());
    }
    if !args.app.is_empty() {
        settings.apps = args.app.clone();
    }
    if let Some(tolerance) = args.tolerance {
        settings.latch_tolerance = tolerance;
    }
    if args.sysex {
        settings.sysex_handshake = true;
    }
    if let Some(level) = &args.log_level {
        settings.log_level = level.clone();
    }
}

/// Checks a configured port name against the ports currently visible.
/// An absent port is not fatal for the daemon, so the caller decides
/// whether to wait or to bail.
pub fn validate_port(name: &str, ports: &[String]) -> Result<(), String> {
    if ports.iter().any(|port| port.contains(name)) {
        Ok(())
    } else {
        Err(format!(
            "Port '{}' not found. Available ports:\n{}",
            name,
            ports
                .iter()
                .map(|port| format!("  - {}", port))
                .collect::<Vec<_>>()
                .join("\n")
        ))
    }
}

/// Interactive port picker for when no port was configured. Returns `None`
/// when there is nothing to pick or the prompt was dismissed.
pub fn choose_port(ports: &[String]) -> Option<String> {
    match ports {
        [] => None,
        [only] => Some(only.clone()),
        _ => {
            let selection = Select::new()
                .with_prompt("Select the remote's MIDI port")
                .items(ports)
                .default(0)
                .interact()
                .ok()?;
            ports.get(selection).cloned()
        }
    }
}
