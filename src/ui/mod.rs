//! Terminal status display
//!
//! This module provides the terminal-based status display for orthoctl,
//! including:
//! - A volume bar tracking the most recent target
//! - A connection/latch status spinner
//!
//! The display is built using the indicatif library and refreshes from the
//! shared status board; it never talks to the hardware or the actuators.

mod display;
mod progress;

pub use display::{run_status_display, StatusDisplay};
pub use progress::{create_status_spinner, create_volume_bar};
