//! Keyboard shortcuts that queue playback commands from the UI.

use eframe::egui;
use shared::protocol::PlaybackCommand;

pub const SHORTCUTS: [(egui::Key, PlaybackCommand); 4] = [
    (egui::Key::ArrowRight, PlaybackCommand::Advance),
    (egui::Key::ArrowLeft, PlaybackCommand::Retreat),
    (egui::Key::Space, PlaybackCommand::TogglePlay),
    (egui::Key::D, PlaybackCommand::ToggleDetails),
];

pub fn command_for_key(key: egui::Key) -> Option<PlaybackCommand> {
    SHORTCUTS
        .iter()
        .find(|(shortcut, _)| *shortcut == key)
        .map(|(_, command)| *command)
}

/// Commands for this frame's key presses, in the order they were pressed.
/// Modified presses (Ctrl+D and the like) are left to the platform.
pub fn pressed_commands(events: &[egui::Event]) -> Vec<PlaybackCommand> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } if modifiers.is_none() => command_for_key(*key),
            _ => None,
        })
        .collect()
}

pub fn shortcut_hint() -> &'static str {
    "Left / Right to move, Space to play or pause, D for details"
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
