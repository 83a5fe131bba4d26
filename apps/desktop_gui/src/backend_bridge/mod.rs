//! Backend bridge: keyboard commands and the backend runtime thread.

pub mod commands;
pub mod runtime;
