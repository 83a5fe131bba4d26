use shared::{domain::PlaybackState, protocol::PlaybackCommand};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::controller::PlaybackController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub commands: u64,
    pub autoplay_ticks: u64,
    pub final_state: PlaybackState,
}

/// Drives `controller` from `commands` and its own autoplay timer until a
/// [`PlaybackCommand::Shutdown`] arrives or every sender is gone.
///
/// Events are handled one at a time, in arrival order; when a command and a tick
/// are ready together the command goes first. The controller is torn down on
/// every exit path.
pub async fn run_session(
    controller: &mut PlaybackController,
    mut commands: mpsc::Receiver<PlaybackCommand>,
) -> SessionSummary {
    let mut summary = SessionSummary {
        commands: 0,
        autoplay_ticks: 0,
        final_state: controller.state(),
    };
    info!(
        steps = controller.catalog().len(),
        period_ms = controller.options().autoplay_period.as_millis() as u64,
        "playback session started"
    );

    loop {
        tokio::select! {
            biased;
            command = commands.recv() => match command {
                Some(PlaybackCommand::Shutdown) => {
                    summary.commands += 1;
                    debug!("shutdown requested");
                    break;
                }
                Some(command) => {
                    summary.commands += 1;
                    controller.apply(command);
                }
                None => {
                    debug!("all command senders dropped");
                    break;
                }
            },
            tick = controller.next_autoplay_tick() => {
                if controller.apply_autoplay_tick(tick) {
                    summary.autoplay_ticks += 1;
                }
            }
        }
    }

    controller.teardown();
    summary.final_state = controller.state();
    info!(
        commands = summary.commands,
        autoplay_ticks = summary.autoplay_ticks,
        final_index = summary.final_state.current_index,
        "playback session ended"
    );
    summary
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
