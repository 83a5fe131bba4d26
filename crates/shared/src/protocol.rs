use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    domain::{progress_fraction, PlaybackState, StepDescriptor},
    error::CommandParseError,
};

/// User-originated requests for the playback controller. Button presses carry no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackCommand {
    Advance,
    Retreat,
    TogglePlay,
    ToggleDetails,
    Shutdown,
}

impl PlaybackCommand {
    pub fn name(self) -> &'static str {
        match self {
            PlaybackCommand::Advance => "advance",
            PlaybackCommand::Retreat => "retreat",
            PlaybackCommand::TogglePlay => "toggle_play",
            PlaybackCommand::ToggleDetails => "toggle_details",
            PlaybackCommand::Shutdown => "shutdown",
        }
    }
}

impl FromStr for PlaybackCommand {
    type Err = CommandParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        // A bare space is how a terminal user "presses" play.
        if input == " " {
            return Ok(PlaybackCommand::TogglePlay);
        }
        match input.trim().to_ascii_lowercase().as_str() {
            "n" | "next" | "right" | "advance" => Ok(PlaybackCommand::Advance),
            "p" | "prev" | "previous" | "left" | "back" | "retreat" => {
                Ok(PlaybackCommand::Retreat)
            }
            "space" | "play" | "pause" | "toggle_play" => Ok(PlaybackCommand::TogglePlay),
            "d" | "details" | "toggle_details" => Ok(PlaybackCommand::ToggleDetails),
            "q" | "quit" | "exit" | "shutdown" => Ok(PlaybackCommand::Shutdown),
            _ => Err(CommandParseError(input.to_string())),
        }
    }
}

/// Why the controller notified its observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Advanced,
    Retreated,
    AutoplayAdvanced,
    PlaybackStarted,
    PlaybackStopped,
    DetailsShown,
    DetailsHidden,
    TornDown,
}

impl Transition {
    pub fn moved_step(self) -> bool {
        matches!(
            self,
            Transition::Advanced | Transition::Retreated | Transition::AutoplayAdvanced
        )
    }
}

/// Owned copy of everything one render pass reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub step_count: usize,
    pub progress: f32,
    pub step: StepDescriptor,
}

impl PlaybackSnapshot {
    pub fn new(state: PlaybackState, step_count: usize, step: StepDescriptor) -> Self {
        Self {
            state,
            step_count,
            progress: progress_fraction(state.current_index, step_count),
            step,
        }
    }

    /// One-based step number as shown to learners.
    pub fn step_number(&self) -> usize {
        self.state.current_index + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keystroke_aliases() {
        assert_eq!("n".parse(), Ok(PlaybackCommand::Advance));
        assert_eq!(" Left ".parse(), Ok(PlaybackCommand::Retreat));
        assert_eq!(" ".parse(), Ok(PlaybackCommand::TogglePlay));
        assert_eq!("pause".parse(), Ok(PlaybackCommand::TogglePlay));
        assert_eq!("D".parse(), Ok(PlaybackCommand::ToggleDetails));
        assert_eq!("quit".parse(), Ok(PlaybackCommand::Shutdown));
    }

    #[test]
    fn rejects_unknown_input() {
        let err = "jump".parse::<PlaybackCommand>().expect_err("unknown");
        assert_eq!(err, CommandParseError("jump".to_string()));
        assert!("".parse::<PlaybackCommand>().is_err());
    }

    #[test]
    fn command_wire_shape_is_tagged() {
        let json = serde_json::to_string(&PlaybackCommand::TogglePlay).expect("serialize");
        assert_eq!(json, r#"{"type":"toggle_play"}"#);
    }

    #[test]
    fn snapshot_derives_progress_and_step_number() {
        let state = PlaybackState {
            current_index: 7,
            is_playing: true,
            show_details: false,
        };
        let snapshot = PlaybackSnapshot::new(state, 8, StepDescriptor::new("Classification", "d"));
        assert_eq!(snapshot.progress, 1.0);
        assert_eq!(snapshot.step_number(), 8);
    }

    #[test]
    fn only_navigation_transitions_move_the_step() {
        assert!(Transition::AutoplayAdvanced.moved_step());
        assert!(!Transition::DetailsShown.moved_step());
        assert!(!Transition::TornDown.moved_step());
    }
}
