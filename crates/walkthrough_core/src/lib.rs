//! Step sequencing and playback for the Vision Transformer walkthrough.
//!
//! The [`PlaybackController`] owns which step is active, the autoplay timer and the
//! detail-panel flag. Hosts render whatever the controller reports through its
//! observer hook and feed button presses back as [`PlaybackCommand`]s.

pub mod autoplay;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod session;
pub mod template;

pub use autoplay::{AutoplayTick, AutoplayTimer, DEFAULT_AUTOPLAY_PERIOD};
pub use catalog::{StepCatalog, DEFAULT_STEP_COUNT};
pub use config::{load_settings, Settings};
pub use controller::{PlaybackController, PlaybackObserver, PlaybackOptions, PlaybackView};
pub use session::{run_session, SessionSummary};
pub use shared::{
    domain::{PlaybackState, StepDescriptor},
    protocol::{PlaybackCommand, PlaybackSnapshot, Transition},
};
pub use template::StepTemplate;
