use std::sync::Arc;

use shared::domain::{PlaybackState, StepDescriptor};
use walkthrough_core::{PlaybackController, StepCatalog};

use super::*;
use crate::backend_bridge::runtime::publish_to_ui;

struct Harness {
    app: WalkthroughApp,
    cmd_rx: mpsc::Receiver<PlaybackCommand>,
    ui_tx: crossbeam_channel::Sender<UiEvent>,
    state_tx: watch::Sender<Option<StateUpdate>>,
}

fn harness() -> Harness {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (ui_tx, ui_rx) = crossbeam_channel::bounded(8);
    let (state_tx, state_rx) = watch::channel(None);
    let snapshot = PlaybackSnapshot::new(
        PlaybackState::default(),
        8,
        StepDescriptor::new("Input Image", "We start with an input image."),
    );
    let app = WalkthroughApp::new(
        cmd_tx,
        ui_rx,
        state_rx,
        snapshot,
        crate::media::placeholder_image(8, 4),
        None,
    );
    Harness {
        app,
        cmd_rx,
        ui_tx,
        state_tx,
    }
}

fn update(transition: Transition, index: usize, playing: bool) -> StateUpdate {
    StateUpdate {
        transition,
        snapshot: PlaybackSnapshot::new(
            PlaybackState {
                current_index: index,
                is_playing: playing,
                show_details: false,
            },
            8,
            StepDescriptor::new("Patch Extraction", "The image is divided into patches."),
        ),
    }
}

#[test]
fn state_updates_replace_the_rendered_snapshot() {
    let mut h = harness();

    h.app.apply_state(update(Transition::AutoplayAdvanced, 1, true));

    assert_eq!(h.app.snapshot().state.current_index, 1);
    assert!(h.app.snapshot().state.is_playing);
    assert_eq!(h.app.status(), "Step 2 of 8");
    assert!(!h.app.is_session_closed());
    assert!(h.app.scroll_to_top);
}

#[test]
fn toggles_do_not_reset_the_scroll_position() {
    let mut h = harness();
    h.app.apply_state(update(Transition::DetailsShown, 0, false));
    assert!(!h.app.scroll_to_top);
}

#[test]
fn buttons_and_shortcuts_queue_commands_until_teardown() {
    let mut h = harness();

    h.app.send(PlaybackCommand::TogglePlay);
    assert_eq!(h.cmd_rx.try_recv(), Ok(PlaybackCommand::TogglePlay));

    h.app.apply_state(update(Transition::TornDown, 0, false));
    h.app.send(PlaybackCommand::Advance);

    assert!(h.app.is_session_closed());
    assert!(h.cmd_rx.try_recv().is_err());
    assert_eq!(h.app.status(), "Walkthrough closed");
}

#[test]
fn startup_error_disables_playback() {
    let mut h = harness();

    h.app.apply_event(UiEvent::Error(UiError::from_message(
        UiErrorContext::BackendStartup,
        "failed to build runtime",
    )));

    assert!(h.app.is_session_closed());
    assert_eq!(h.app.status(), "Playback unavailable: failed to build runtime");
}

#[test]
fn window_catches_up_to_the_controller_after_missing_many_changes() {
    let mut h = harness();
    let mut controller = PlaybackController::new(
        Arc::new(StepCatalog::vision_transformer()),
        Default::default(),
    );
    controller.subscribe(publish_to_ui(h.state_tx.clone(), egui::Context::default()));

    // More changes than any event queue between the threads would hold.
    for _ in 0..300 {
        controller.advance();
    }
    controller.retreat();
    h.app.process_ui_events();

    assert_eq!(h.app.snapshot(), &controller.snapshot());
    assert_eq!(h.app.snapshot().state.current_index, 299 % 8);
    assert_eq!(h.app.status(), "Step 4 of 8");
}

#[test]
fn notices_and_state_are_both_drained() {
    let mut h = harness();
    h.ui_tx
        .send(UiEvent::Info("8 steps ready".to_string()))
        .expect("queue open");
    h.state_tx.send_replace(Some(update(Transition::Advanced, 1, false)));

    h.app.process_ui_events();

    assert_eq!(h.app.snapshot().state.current_index, 1);
    assert_eq!(h.app.status(), "Step 2 of 8");

    // The slot was already read, so only the new notice applies.
    h.ui_tx
        .send(UiEvent::Info("loaded".to_string()))
        .expect("queue open");
    h.app.process_ui_events();
    assert_eq!(h.app.status(), "loaded");
}

#[test]
fn final_state_is_read_after_the_backend_is_gone() {
    let mut h = harness();
    h.state_tx.send_replace(Some(update(Transition::TornDown, 3, false)));
    drop(h.state_tx);

    h.app.process_ui_events();

    assert!(h.app.is_session_closed());
    assert_eq!(h.app.snapshot().state.current_index, 3);
}

#[test]
fn fit_size_keeps_aspect_ratio() {
    assert_eq!(fit_size([640, 480], 320.0), egui::vec2(320.0, 240.0));
    assert_eq!(fit_size([100, 200], 320.0), egui::vec2(160.0, 320.0));
    assert_eq!(fit_size([0, 0], 10.0), egui::vec2(10.0, 10.0));
}

#[test]
fn token_grids_are_near_square() {
    assert_eq!(grid_columns(16), 4);
    assert_eq!(grid_columns(10), 4);
    assert_eq!(grid_columns(1), 1);
    assert_eq!(grid_columns(0), 1);
}
