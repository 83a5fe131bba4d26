//! Backend thread: owns the playback controller and runs the session loop.

use std::{sync::Arc, thread};

use crossbeam_channel::Sender;
use eframe::egui;
use shared::protocol::{PlaybackCommand, Transition};
use tokio::sync::{mpsc, watch};
use walkthrough_core::{run_session, PlaybackController, PlaybackView, Settings, StepCatalog};

use crate::{
    backend_bridge::commands::shortcut_hint,
    controller::events::{StateUpdate, UiError, UiErrorContext, UiEvent},
};

/// Spawns the backend thread. The session ends when every command sender is
/// dropped or a shutdown command arrives.
pub fn launch(
    catalog: Arc<StepCatalog>,
    settings: Settings,
    cmd_rx: mpsc::Receiver<PlaybackCommand>,
    state_tx: watch::Sender<Option<StateUpdate>>,
    ui_tx: Sender<UiEvent>,
    repaint: egui::Context,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                repaint.request_repaint();
                tracing::error!("failed to build playback runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let options = match settings.playback_options() {
                Ok(options) => options,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        err.to_string(),
                    )));
                    repaint.request_repaint();
                    return;
                }
            };

            let mut controller = PlaybackController::new(catalog, options);
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "{} steps ready. {}",
                controller.catalog().len(),
                shortcut_hint()
            )));
            controller.subscribe(publish_to_ui(state_tx, repaint.clone()));
            settings.apply_initial_state(&mut controller);
            repaint.request_repaint();

            let summary = run_session(&mut controller, cmd_rx).await;
            tracing::info!(
                commands = summary.commands,
                autoplay_ticks = summary.autoplay_ticks,
                "gui playback session finished"
            );
        });
    })
}

/// Observer that overwrites the UI's state slot with every change. The slot
/// holds one value, so a window that stops draining it still sees the newest state.
pub fn publish_to_ui(
    state_tx: watch::Sender<Option<StateUpdate>>,
    repaint: egui::Context,
) -> impl FnMut(Transition, &PlaybackView<'_>) + Send + 'static {
    move |transition: Transition, view: &PlaybackView<'_>| {
        state_tx.send_replace(Some(StateUpdate {
            transition,
            snapshot: view.to_snapshot(),
        }));
        repaint.request_repaint();
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
