//! Terminal frames and their rendering for qsh.
//!
//! This module provides:
//! - Frame types (cells, rows, renditions, cursor)
//! - The mosh-style frame differ producing minimal ANSI output
//! - A renderer retaining the last frame between calls

mod display;
mod framebuffer;
mod renderer;

#[cfg(test)]
mod proptest;

pub use display::Display;
pub use framebuffer::{Cell, CellAttrs, Color, Cursor, Frame, Rendition, Row};
pub use renderer::Renderer;
