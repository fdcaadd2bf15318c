//! Volume latch state machine.
//!
//! A freshly connected dial reports an absolute position that usually has
//! nothing to do with the application's current volume. The latch holds
//! readings back until one lands within `tolerance` percentage points of the
//! reference volume sampled at connect time; from then on every reading
//! passes through until the connection is torn down. A latch belongs to a
//! single connection and is rebuilt from scratch on reconnect.

use log::{debug, info};

/// Decision for a single dial reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchDecision {
    /// First reading to land inside the tolerance window; the latch is now
    /// engaged and the reading passes through.
    Engaged,
    /// Reading passed through an already-engaged latch.
    Pass,
    /// Reading discarded; the dial has not reached the reference yet.
    Hold { reference: u8, distance: u8 },
}

impl LatchDecision {
    /// True when the reading should be forwarded to the volume pipeline.
    pub fn passes(&self) -> bool {
        !matches!(self, LatchDecision::Hold { .. })
    }
}

pub struct VolumeLatch {
    reference: Option<u8>,
    tolerance: u8,
    latched: bool,
}

impl VolumeLatch {
    /// Builds a latch for a new connection. `reference` is the application
    /// volume sampled at connect time, if one could be read.
    pub fn new(reference: Option<u8>, tolerance: u8) -> Self {
        Self {
            reference,
            tolerance,
            latched: false,
        }
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    pub fn reference(&self) -> Option<u8> {
        self.reference
    }

    /// Feeds one dial reading (0-100) through the latch.
    pub fn observe(&mut self, percent: u8) -> LatchDecision {
        if self.latched {
            return LatchDecision::Pass;
        }

        match self.reference {
            None => {
                // Nothing to latch against, so prefer responsiveness.
                self.latched = true;
                info!("No reference volume; latched immediately at {}%", percent);
                LatchDecision::Engaged
            }
            Some(reference) => {
                let distance = percent.abs_diff(reference);
                if distance <= self.tolerance {
                    self.latched = true;
                    info!("Dial latched at {}% (app volume {}%)", percent, reference);
                    LatchDecision::Engaged
                } else {
                    debug!(
                        "Holding dial at {}%: app volume {}%, distance {}% exceeds tolerance {}%",
                        percent, reference, distance, self.tolerance
                    );
                    LatchDecision::Hold { reference, distance }
                }
            }
        }
    }
}
