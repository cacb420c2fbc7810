//! Mosh-style display renderer.
//!
//! Converts a pair of frames into the ANSI escape sequences that turn a
//! terminal showing the first into one showing the second, optimizing for
//! bandwidth: unchanged cells cost nothing, blank runs collapse into erase
//! codes, and whole-screen scrolls become newlines.

use std::fmt::Write;

use tracing::trace;

use super::framebuffer::{Frame, Rendition};
use crate::config::DisplayConfig;
use crate::constants::{
    BELL, CLEAR_SCREEN, COMBINING_BASE, CURSOR_HIDE, CURSOR_SHOW, ERASE_ONE_CHAR, ERASE_TO_EOL,
    OSC_TITLE_START, REVERSE_VIDEO_OFF, REVERSE_VIDEO_ON, SGR_RESET, STRING_TERMINATOR,
};

/// Frame differ. Stateless apart from terminal capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Display {
    config: DisplayConfig,
}

/// Working state for one `new_frame` call.
///
/// `last` is a private copy of the previous frame: the scroll shortcut
/// rotates its rows and silent moves record the cursor as hidden in it.
struct FrameState {
    out: String,
    last: Frame,
    /// Cell being considered.
    x: u16,
    y: u16,
    /// Where the terminal's cursor is believed to be.
    cursor_x: u16,
    cursor_y: u16,
    /// The cursor was moved to the next line by an autowrap that has not
    /// happened yet: the terminal is still parked on the last column.
    pending_wrap: bool,
    /// Rendition the terminal is believed to be using.
    current_rendition: Rendition,
}

impl FrameState {
    fn new(last: &Frame) -> Self {
        Self {
            out: String::new(),
            last: last.clone(),
            x: 0,
            y: 0,
            cursor_x: 0,
            cursor_y: 0,
            pending_wrap: false,
            current_rendition: Rendition::default(),
        }
    }

    /// Append an absolute cursor position (CUP), 1-based on the wire.
    fn append_move(&mut self, y: u16, x: u16) {
        let _ = write!(self.out, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
        self.pending_wrap = false;
    }

    /// Move the cursor, hiding it first so the jump is never visible.
    fn append_silent_move(&mut self, y: u16, x: u16) {
        if self.last.cursor.visible {
            self.out.push_str(CURSOR_HIDE);
            self.last.cursor.visible = false;
        }
        self.append_move(y, x);
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn append_rendition(&mut self, rendition: Rendition) {
        self.out.push_str(&rendition.sgr());
        self.current_rendition = rendition;
    }
}

impl Display {
    /// Create a display for a terminal with the given capabilities.
    pub fn new(config: DisplayConfig) -> Self {
        Self { config }
    }

    /// Whether ECH may be emitted.
    pub fn has_ech(&self) -> bool {
        self.config.has_ech
    }

    /// Generate the escape sequences that transform `last` into `frame`.
    ///
    /// With `initialized` false the terminal's contents are treated as
    /// unknown and every attribute is sent. A geometry change forces the same.
    pub fn new_frame(&self, mut initialized: bool, last: &Frame, frame: &Frame) -> Vec<u8> {
        let mut state = FrameState::new(last);

        if frame.bell_count != state.last.bell_count {
            state.out.push_str(BELL);
        }

        if !initialized || frame.title != state.last.title {
            state.out.push_str(OSC_TITLE_START);
            state.out.push_str(&frame.title);
            state.out.push_str(STRING_TERMINATOR);
        }

        if !initialized || frame.reverse_video != state.last.reverse_video {
            state.out.push_str(if frame.reverse_video {
                REVERSE_VIDEO_ON
            } else {
                REVERSE_VIDEO_OFF
            });
        }

        let width = frame.cols();
        let height = frame.rows();

        if !initialized || width != state.last.cols() || height != state.last.rows() {
            state.out.push_str(CLEAR_SCREEN);
            initialized = false;
            state.cursor_x = 0;
            state.cursor_y = 0;
            state.current_rendition = Rendition::default();
        } else {
            state.cursor_x = state.last.cursor.col;
            state.cursor_y = state.last.cursor.row;
            state.current_rendition = state.last.rendition;
        }

        let start_row = if initialized {
            self.scroll_shortcut(&mut state, frame)
        } else {
            0
        };

        for y in start_row..height {
            state.y = y;
            state.x = 0;
            let mut last_x = 0;

            while state.x < width {
                last_x = state.x;
                self.put_cell(initialized, &mut state, frame);

                // Let the real cursor wrap where the line wrapped, so a
                // word-select on the terminal groups the two lines.
                if state.cursor_x >= width
                    && y < height - 1
                    && frame.row(y).wrap
                    && (!initialized || !state.last.row(y).wrap)
                {
                    state.cursor_x = 0;
                    state.cursor_y += 1;
                    state.pending_wrap = true;
                }
            }

            // The terminal only drops a line's wrap state when the line is
            // redrawn, so clear from the last cell and draw it again.
            if width > 0
                && y < height - 1
                && !frame.row(y).wrap
                && (!initialized || state.last.row(y).wrap)
            {
                state.x = last_x;
                // EL paints with whatever rendition is active, not the
                // frame's own.
                if initialized {
                    state.last.reset_cell(y, last_x, state.current_rendition);
                }
                state.append_move(y, last_x);
                state.out.push_str(ERASE_TO_EOL);
                state.cursor_x = last_x;
                state.cursor_y = y;

                self.put_cell(initialized, &mut state, frame);
            }
        }

        if !initialized
            || state.pending_wrap
            || frame.cursor.row != state.cursor_y
            || frame.cursor.col != state.cursor_x
        {
            state.append_move(frame.cursor.row, frame.cursor.col);
            state.cursor_x = frame.cursor.col;
            state.cursor_y = frame.cursor.row;
        }

        if !initialized || frame.cursor.visible != state.last.cursor.visible {
            state.out.push_str(if frame.cursor.visible {
                CURSOR_SHOW
            } else {
                CURSOR_HIDE
            });
        }

        if !initialized || frame.rendition != state.current_rendition {
            state.append_rendition(frame.rendition);
        }

        state.out.into_bytes()
    }

    /// Detect a whole-screen scroll and replay it with newlines.
    ///
    /// Returns the first row that still needs a per-cell diff. Only the first
    /// previous row matching the new top row is considered. A match at offset
    /// zero just means the top rows are unchanged.
    fn scroll_shortcut(&self, state: &mut FrameState, frame: &Frame) -> u16 {
        let height = frame.rows();
        if height == 0 {
            return 0;
        }
        let top = frame.row(0);

        let Some(lines_scrolled) = (0..height).find(|&row| top == state.last.row(row)) else {
            return 0;
        };

        let mut scroll_height = 1;
        for region_height in 1..height - lines_scrolled {
            if frame.row(region_height) == state.last.row(lines_scrolled + region_height) {
                scroll_height = region_height + 1;
            } else {
                break;
            }
        }

        if lines_scrolled > 0 {
            trace!(lines_scrolled, scroll_height, "scroll shortcut");

            if state.cursor_y != height - 1 {
                state.append_silent_move(height - 1, 0);
            }

            if !state.current_rendition.is_default() {
                state.out.push_str(SGR_RESET);
                state.current_rendition = Rendition::default();
            }

            for _ in 0..lines_scrolled {
                state.out.push('\n');
            }

            state.last.scroll_up(lines_scrolled);
        }

        scroll_height
    }

    /// Emit the cheapest encoding of the cell at `(state.x, state.y)` and
    /// advance `state.x` past it.
    fn put_cell(&self, initialized: bool, state: &mut FrameState, frame: &Frame) {
        let (x, y) = (state.x, state.y);
        let cell = frame.cell(y, x);
        debug_assert!(cell.width > 0, "zero-width cell at {x},{y}");

        if initialized && cell == state.last.cell(y, x) {
            state.x = state.x.saturating_add(u16::from(cell.width));
            return;
        }

        // Erases act where the terminal really is, so a pending wrap has to
        // be resolved with a move first. Glyphs wrap by themselves.
        if x != state.cursor_x
            || y != state.cursor_y
            || (state.pending_wrap && cell.is_blank())
        {
            state.append_silent_move(y, x);
        }

        if state.current_rendition != cell.rendition {
            state.append_rendition(cell.rendition);
        }

        if cell.is_blank() {
            let width = frame.cols();
            let clear_count = frame.row(y).cells[usize::from(x)..]
                .iter()
                .take_while(|other| other.rendition == cell.rendition && other.is_blank())
                .count() as u16;
            debug_assert!(x + clear_count <= width);

            if x + clear_count == width {
                state.out.push_str(ERASE_TO_EOL);
                state.x += clear_count;
            } else if self.config.has_ech {
                if clear_count == 1 {
                    state.out.push_str(ERASE_ONE_CHAR);
                } else {
                    let _ = write!(state.out, "\x1b[{clear_count}X");
                }
                state.x += clear_count;
            } else {
                state.out.push(' ');
                state.cursor_x += 1;
                state.x += 1;
            }
            return;
        }

        if cell.fallback {
            state.out.push(COMBINING_BASE);
        }
        state.out.push_str(&cell.contents);
        state.pending_wrap = false;

        state.x = state.x.saturating_add(u16::from(cell.width));
        state.cursor_x = state.cursor_x.saturating_add(u16::from(cell.width));
    }
}

// =============================================================================
// Tests
// =============================================================================
