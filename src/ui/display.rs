use std::thread;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

use super::progress::{create_status_spinner, create_volume_bar};
use crate::state::{Status, StatusBoard};

pub struct StatusDisplay {
    board: StatusBoard,

    #[allow(dead_code)]
    multi_progress: MultiProgress,
    volume_pb: ProgressBar,
    status_pb: ProgressBar,
}

impl StatusDisplay {
    pub fn new(board: StatusBoard) -> Self {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());
        let volume_pb = create_volume_bar(&multi_progress);
        let status_pb = create_status_spinner(&multi_progress);

        StatusDisplay {
            board,
            multi_progress,
            volume_pb,
            status_pb,
        }
    }

    pub fn run(&self) {
        loop {
            thread::sleep(Duration::from_millis(100));
            let status = self.board.snapshot();

            // The bar tracks the newest target; before any target exists it
            // shows whatever was last synced, or rests at zero.
            let shown = status.target.or(status.last_synced).unwrap_or(0);
            self.volume_pb.set_position(u64::from(shown));

            // Update the status spinner message.
            self.status_pb.set_message(describe(&status));

            // Tick the spinner to animate it.
            self.status_pb.tick();
        }
    }
}

fn describe(status: &Status) -> String {
    if !status.connected {
        return "Waiting for remote...".to_string();
    }
    if !status.latched {
        return match status.reference {
            Some(reference) => format!("Connected; turn the dial toward {}% to latch", reference),
            None => "Connected; waiting for first movement".to_string(),
        };
    }

    let synced = status
        .last_synced
        .map(|volume| format!("{}%", volume))
        .unwrap_or_else(|| "nothing yet".to_string());

    if status.cooling_down {
        format!("Latched; rate limited, holding at {}", synced)
    } else {
        format!("Latched; last synced {}", synced)
    }
}

/// Entry point for the display thread.
pub fn run_status_display(board: StatusBoard) {
    StatusDisplay::new(board).run();
}
