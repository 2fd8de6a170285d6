//! `step-curves` library crate.
//!
//! The binary (`steps`) is a thin wrapper around this library so that the
//! interpolation and calorie logic is testable without spawning processes.

pub mod app;
pub mod calories;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod interp;
pub mod io;
pub mod plot;
pub mod report;
pub mod tui;
