//! Synthetic input data for demos and the TUI.

pub mod sample;

pub use sample::*;
