//! Backend-to-UI events for the walkthrough window.

use shared::protocol::{PlaybackSnapshot, Transition};

/// Latest controller state, published through a `watch` slot so the window
/// always renders the newest one no matter how many it missed.
#[derive(Debug, Clone, PartialEq)]
pub struct StateUpdate {
    pub transition: Transition,
    pub snapshot: PlaybackSnapshot,
}

/// Discrete backend notices, queued in order.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SourceImage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status bar text; startup failures mean the controls no longer do anything.
    pub fn status_text(&self) -> String {
        match self.context {
            UiErrorContext::BackendStartup => {
                format!("Playback unavailable: {}", self.message)
            }
            UiErrorContext::SourceImage => format!("Source image: {}", self.message),
        }
    }
}

/// Short status line for a state change.
pub fn describe_transition(transition: Transition, snapshot: &PlaybackSnapshot) -> String {
    match transition {
        Transition::PlaybackStarted => "Autoplay on".to_string(),
        Transition::PlaybackStopped => "Autoplay off".to_string(),
        Transition::DetailsShown => "Technical details shown".to_string(),
        Transition::DetailsHidden => "Technical details hidden".to_string(),
        Transition::TornDown => "Walkthrough closed".to_string(),
        Transition::Advanced | Transition::Retreated | Transition::AutoplayAdvanced => format!(
            "Step {} of {}",
            snapshot.step_number(),
            snapshot.step_count
        ),
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
