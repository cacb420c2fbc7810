//! Retained-frame renderer.
//!
//! Keeps the last frame drawn so each call only has to supply the new one:
//! 1. First call (or after `invalidate`): full redraw
//! 2. Later calls: diff against the retained frame
//! 3. Retain the new frame for the next call

use tracing::debug;

use super::display::Display;
use super::framebuffer::Frame;
use crate::config::DisplayConfig;

/// Renderer that remembers what it last put on the terminal.
#[derive(Debug, Default)]
pub struct Renderer {
    display: Display,
    /// What we believe is currently on the terminal screen.
    last_frame: Option<Frame>,
}

impl Renderer {
    /// Create a new renderer.
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            display: Display::new(config),
            last_frame: None,
        }
    }

    /// Produce the bytes that bring the terminal up to `frame`.
    pub fn render(&mut self, frame: &Frame) -> Vec<u8> {
        let output = match &self.last_frame {
            Some(last) => self.display.new_frame(true, last, frame),
            None => {
                let blank = Frame::new(frame.cols(), frame.rows());
                self.display.new_frame(false, &blank, frame)
            }
        };

        debug!(
            bytes = output.len(),
            full = self.last_frame.is_none(),
            cols = frame.cols(),
            rows = frame.rows(),
            "rendered frame"
        );

        self.last_frame = Some(frame.clone());
        output
    }

    /// Force a full redraw on next render.
    pub fn invalidate(&mut self) {
        self.last_frame = None;
    }

    /// The frame the terminal is believed to show.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }
}
