//! qsh-display: mosh-style terminal output for qsh.
//!
//! This crate provides:
//! - Frame snapshots of terminal-visible state
//! - A differ that emits the smallest escape-sequence stream taking a
//!   terminal from one frame to the next
//! - Terminal capability configuration
//! - Logging setup

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod terminal;

pub use config::DisplayConfig;
pub use error::{Error, Result};
pub use logging::{LogFormat, init_logging};
pub use terminal::{Display, Frame, Renderer};
