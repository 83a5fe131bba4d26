use std::{sync::Arc, time::Duration};

use shared::{
    domain::{progress_fraction, PlaybackState, StepDescriptor},
    error::ConfigError,
    protocol::{PlaybackCommand, PlaybackSnapshot, Transition},
};
use tracing::debug;

use crate::{
    autoplay::{AutoplayTick, AutoplayTimer, DEFAULT_AUTOPLAY_PERIOD},
    catalog::StepCatalog,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOptions {
    pub autoplay_period: Duration,
}

impl PlaybackOptions {
    pub fn new(autoplay_period: Duration) -> Result<Self, ConfigError> {
        if autoplay_period.is_zero() {
            return Err(ConfigError::ZeroAutoplayPeriod);
        }
        Ok(Self { autoplay_period })
    }
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            autoplay_period: DEFAULT_AUTOPLAY_PERIOD,
        }
    }
}

/// What a render pass reads: the state plus the step it points at.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackView<'a> {
    pub state: PlaybackState,
    pub step: &'a StepDescriptor,
    pub step_count: usize,
}

impl PlaybackView<'_> {
    pub fn progress(&self) -> f32 {
        progress_fraction(self.state.current_index, self.step_count)
    }

    pub fn to_snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot::new(self.state, self.step_count, self.step.clone())
    }
}

/// Notified synchronously after every state change, with the new state.
pub trait PlaybackObserver: Send {
    fn on_transition(&mut self, transition: Transition, view: &PlaybackView<'_>);
}

impl<F> PlaybackObserver for F
where
    F: FnMut(Transition, &PlaybackView<'_>) + Send,
{
    fn on_transition(&mut self, transition: Transition, view: &PlaybackView<'_>) {
        self(transition, view)
    }
}

/// Owns the playback state and the autoplay timer.
///
/// Autoplay ticks are only delivered through [`next_autoplay_tick`](Self::next_autoplay_tick),
/// so the host's event loop decides when a tick is applied and no tick can race a
/// user command. Dropping the controller drops the timer.
pub struct PlaybackController {
    catalog: Arc<StepCatalog>,
    options: PlaybackOptions,
    state: PlaybackState,
    autoplay: Option<AutoplayTimer>,
    generation: u64,
    torn_down: bool,
    observers: Vec<Box<dyn PlaybackObserver>>,
}

impl PlaybackController {
    pub fn new(catalog: Arc<StepCatalog>, options: PlaybackOptions) -> Self {
        Self {
            catalog,
            options,
            state: PlaybackState::default(),
            autoplay: None,
            generation: 0,
            torn_down: false,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl PlaybackObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn options(&self) -> PlaybackOptions {
        self.options
    }

    pub fn current_step(&self) -> &StepDescriptor {
        self.catalog.get(self.state.current_index)
    }

    pub fn progress_fraction(&self) -> f32 {
        progress_fraction(self.state.current_index, self.catalog.len())
    }

    pub fn view(&self) -> PlaybackView<'_> {
        PlaybackView {
            state: self.state,
            step: self.current_step(),
            step_count: self.catalog.len(),
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.view().to_snapshot()
    }

    pub fn is_autoplay_armed(&self) -> bool {
        self.autoplay.is_some()
    }

    pub fn advance(&mut self) {
        self.step_forward();
        self.notify(Transition::Advanced);
    }

    pub fn retreat(&mut self) {
        let len = self.catalog.len();
        self.state.current_index = (self.state.current_index + len - 1) % len;
        self.notify(Transition::Retreated);
    }

    /// Starting playback arms a tokio interval, so it must run inside a runtime.
    pub fn toggle_play(&mut self) {
        if self.state.is_playing {
            self.autoplay = None;
            self.state.is_playing = false;
            self.notify(Transition::PlaybackStopped);
        } else {
            self.generation += 1;
            self.autoplay = Some(AutoplayTimer::arm(
                self.options.autoplay_period,
                self.generation,
            ));
            self.state.is_playing = true;
            self.notify(Transition::PlaybackStarted);
        }
    }

    pub fn toggle_details(&mut self) {
        self.state.show_details = !self.state.show_details;
        let transition = if self.state.show_details {
            Transition::DetailsShown
        } else {
            Transition::DetailsHidden
        };
        self.notify(transition);
    }

    pub fn apply(&mut self, command: PlaybackCommand) {
        debug!(command = command.name(), "applying playback command");
        match command {
            PlaybackCommand::Advance => self.advance(),
            PlaybackCommand::Retreat => self.retreat(),
            PlaybackCommand::TogglePlay => self.toggle_play(),
            PlaybackCommand::ToggleDetails => self.toggle_details(),
            PlaybackCommand::Shutdown => self.teardown(),
        }
    }

    /// Waits for the next autoplay period. Never resolves while paused.
    pub async fn next_autoplay_tick(&mut self) -> AutoplayTick {
        match self.autoplay.as_mut() {
            Some(timer) => timer.tick().await,
            None => std::future::pending().await,
        }
    }

    /// Advances for a tick produced by the currently armed timer.
    ///
    /// Returns `false` and leaves the state alone when playback was stopped (or
    /// restarted) after the tick was produced.
    pub fn apply_autoplay_tick(&mut self, tick: AutoplayTick) -> bool {
        let current = self.autoplay.as_ref().map(AutoplayTimer::generation);
        if current != Some(tick.generation()) {
            debug!(
                tick_generation = tick.generation(),
                "discarding autoplay tick from a cancelled timer"
            );
            return false;
        }
        self.step_forward();
        self.notify(Transition::AutoplayAdvanced);
        true
    }

    /// Releases the autoplay timer. Safe to call repeatedly; observers hear about it once.
    pub fn teardown(&mut self) {
        self.autoplay = None;
        self.state.is_playing = false;
        if !self.torn_down {
            self.notify(Transition::TornDown);
        }
    }

    fn step_forward(&mut self) {
        self.state.current_index = (self.state.current_index + 1) % self.catalog.len();
    }

    fn notify(&mut self, transition: Transition) {
        self.torn_down = transition == Transition::TornDown;
        let view = PlaybackView {
            state: self.state,
            step: self.catalog.get(self.state.current_index),
            step_count: self.catalog.len(),
        };
        debug!(
            ?transition,
            index = view.state.current_index,
            playing = view.state.is_playing,
            details = view.state.show_details,
            "playback state changed"
        );
        for observer in &mut self.observers {
            observer.on_transition(transition, &view);
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if self.autoplay.is_some() {
            debug!("playback controller dropped while autoplay was armed");
        }
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
