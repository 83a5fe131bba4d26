//! Command orchestration from UI actions to the playback session.

use shared::protocol::PlaybackCommand;
use tokio::sync::mpsc::{error::TrySendError, Sender};

pub fn dispatch_playback_command(
    cmd_tx: &Sender<PlaybackCommand>,
    cmd: PlaybackCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->session command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Closed(_)) => {
            *status = "Playback session has ended; restart the walkthrough".to_string();
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
