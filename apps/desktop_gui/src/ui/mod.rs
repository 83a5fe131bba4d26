//! UI layer for the walkthrough window.

pub mod app;

pub use app::WalkthroughApp;
