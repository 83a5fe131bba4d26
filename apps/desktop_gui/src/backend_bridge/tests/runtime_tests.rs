use std::time::Duration;

use super::*;

fn vit_controller() -> PlaybackController {
    PlaybackController::new(
        Arc::new(StepCatalog::vision_transformer()),
        Default::default(),
    )
}

#[test]
fn observer_publishes_the_new_state() {
    let (state_tx, state_rx) = watch::channel(None);
    let mut controller = vit_controller();
    controller.subscribe(publish_to_ui(state_tx, egui::Context::default()));

    controller.retreat();

    let update = state_rx.borrow().clone().expect("published");
    assert_eq!(update.transition, Transition::Retreated);
    assert_eq!(update.snapshot.state.current_index, 7);
    assert_eq!(update.snapshot.step.title, "Classification");
}

#[test]
fn unread_changes_collapse_to_the_current_state() {
    let (state_tx, mut state_rx) = watch::channel(None);
    let mut controller = vit_controller();
    controller.subscribe(publish_to_ui(state_tx, egui::Context::default()));

    for _ in 0..1000 {
        controller.advance();
    }
    controller.toggle_details();

    assert!(state_rx.has_changed().expect("sender alive"));
    let update = state_rx.borrow_and_update().clone().expect("published");
    assert_eq!(update.transition, Transition::DetailsShown);
    assert_eq!(update.snapshot, controller.snapshot());
    assert_eq!(update.snapshot.state.current_index, 1000 % 8);
}

#[test]
fn observer_survives_a_closed_ui() {
    let (state_tx, state_rx) = watch::channel(None);
    drop(state_rx);
    let mut controller = vit_controller();
    controller.subscribe(publish_to_ui(state_tx, egui::Context::default()));

    controller.advance();
    controller.advance();
    assert_eq!(controller.state().current_index, 2);
}

#[test]
fn session_ends_with_the_teardown_state_published() {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (state_tx, state_rx) = watch::channel(None);
    let (ui_tx, ui_rx) = crossbeam_channel::bounded(8);
    let settings = Settings {
        show_details: true,
        ..Settings::default()
    };

    let backend = launch(
        Arc::new(StepCatalog::vision_transformer()),
        settings,
        cmd_rx,
        state_tx,
        ui_tx,
        egui::Context::default(),
    );
    cmd_tx
        .blocking_send(PlaybackCommand::Advance)
        .expect("session accepts commands");
    drop(cmd_tx);
    backend.join().expect("backend thread exits cleanly");

    match ui_rx.recv_timeout(Duration::from_secs(1)) {
        Ok(UiEvent::Info(message)) => assert!(message.starts_with("8 steps ready"), "{message}"),
        other => panic!("expected the ready notice, got {other:?}"),
    }
    let last = state_rx.borrow().clone().expect("published");
    assert_eq!(last.transition, Transition::TornDown);
    assert_eq!(last.snapshot.state.current_index, 1);
    assert!(last.snapshot.state.show_details);
    assert!(!last.snapshot.state.is_playing);
}

#[test]
fn invalid_period_is_reported_as_a_startup_error() {
    let (_cmd_tx, cmd_rx) = mpsc::channel(1);
    let (state_tx, state_rx) = watch::channel(None);
    let (ui_tx, ui_rx) = crossbeam_channel::bounded(4);
    let settings = Settings {
        autoplay_period_ms: 0,
        ..Settings::default()
    };

    launch(
        Arc::new(StepCatalog::vision_transformer()),
        settings,
        cmd_rx,
        state_tx,
        ui_tx,
        egui::Context::default(),
    )
    .join()
    .expect("backend thread exits cleanly");

    match ui_rx.try_recv() {
        Ok(UiEvent::Error(err)) => assert_eq!(err.context(), UiErrorContext::BackendStartup),
        other => panic!("expected a startup error, got {other:?}"),
    }
    assert!(state_rx.borrow().is_none());
}
