//! DevPal action library
//!
//! Fetches the `micromap` scanner from a GitHub release and runs it over the
//! checked-out workspace. The binary in `main.rs` only parses inputs, sets up
//! logging and reports the outcome; everything else lives here.

pub mod config;
pub mod download;
pub mod error;
pub mod orchestration;
pub mod outputs;
pub mod release;
pub mod toolchain;

pub use config::{ActionConfig, Inputs, Settings};
pub use error::ActionError;
pub use orchestration::{Orchestrator, RunReport};
