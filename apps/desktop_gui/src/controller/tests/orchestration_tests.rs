use super::*;
use tokio::sync::mpsc;

#[test]
fn queued_command_leaves_status_alone() {
    let (tx, mut rx) = mpsc::channel(4);
    let mut status = "ready".to_string();

    dispatch_playback_command(&tx, PlaybackCommand::Advance, &mut status);

    assert_eq!(status, "ready");
    assert_eq!(rx.try_recv(), Ok(PlaybackCommand::Advance));
}

#[test]
fn full_queue_asks_the_user_to_retry() {
    let (tx, _rx) = mpsc::channel(1);
    let mut status = String::new();

    dispatch_playback_command(&tx, PlaybackCommand::Advance, &mut status);
    dispatch_playback_command(&tx, PlaybackCommand::Retreat, &mut status);

    assert_eq!(status, "UI command queue is full; please retry");
}

#[test]
fn closed_session_is_reported() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let mut status = String::new();

    dispatch_playback_command(&tx, PlaybackCommand::TogglePlay, &mut status);

    assert_eq!(status, "Playback session has ended; restart the walkthrough");
}
