//! Input/output helpers.
//!
//! - manual entry + CSV ingest and validation (`ingest`)
//! - per-hour table export (`export`)
//! - run JSON read/write (`run_file`)

pub mod export;
pub mod ingest;
pub mod run_file;

pub use export::*;
pub use ingest::*;
pub use run_file::*;
