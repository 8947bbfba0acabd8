//! Library surface of the import CLI.
//!
//! Command logic lives here rather than in `main.rs` so integration tests
//! can drive imports without spawning the binary.

pub mod commands;
pub mod logging;
pub mod summary;

pub use commands::{Entity, MapOutcome, run_import, run_map};
