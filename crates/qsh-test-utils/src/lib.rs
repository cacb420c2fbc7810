//! qsh-test-utils: Test infrastructure for qsh-display.
//!
//! Provides:
//! - ReplayTerminal: model terminal that applies rendered output to a frame
//! - Frame builders for writing text into frames

mod frames;
mod replay;

pub use frames::{text_frame, write_text};
pub use replay::ReplayTerminal;
