//! VTE-driven model terminal for checking rendered output.
//!
//! Applies the escape sequences produced by `qsh_display` to a frame so tests
//! can compare what a terminal would end up showing with the frame that was
//! meant to be drawn. Only the sequences the display emits are modelled.

use unicode_width::UnicodeWidthChar;
use vte::{Params, Parser, Perform};

use qsh_display::constants::COMBINING_BASE;
use qsh_display::terminal::{Cell, CellAttrs, Color, Frame, Rendition};

/// A model terminal fed with rendered bytes.
pub struct ReplayTerminal {
    state: ReplayState,
    parser: Parser,
}

struct ReplayState {
    frame: Frame,
    /// Cursor sits past the last column; the next print wraps first.
    pending_wrap: bool,
    /// Positions (row, col) that received a printed glyph.
    printed: Vec<(u16, u16)>,
}

impl ReplayTerminal {
    /// A terminal of the given size with unknown (blank) contents.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self::showing(&Frame::new(cols, rows))
    }

    /// A terminal currently displaying `frame`.
    pub fn showing(frame: &Frame) -> Self {
        Self {
            state: ReplayState {
                frame: frame.clone(),
                pending_wrap: false,
                printed: Vec::new(),
            },
            parser: Parser::new(),
        }
    }

    /// Feed rendered output.
    pub fn process(&mut self, data: &[u8]) {
        let mut performer = Performer {
            state: &mut self.state,
        };
        for &byte in data {
            self.parser.advance(&mut performer, byte);
        }
    }

    /// What the terminal shows.
    pub fn frame(&self) -> &Frame {
        &self.state.frame
    }

    /// Where the next character will land, as (row, col).
    ///
    /// With a wrap pending this is the start of the following line.
    pub fn cursor_position(&self) -> (u16, u16) {
        let cursor = self.state.frame.cursor;
        if self.state.pending_wrap && cursor.row + 1 < self.state.frame.rows() {
            (cursor.row + 1, 0)
        } else {
            (cursor.row, cursor.col)
        }
    }

    /// Positions (row, col) that received a printed glyph so far.
    pub fn printed(&self) -> &[(u16, u16)] {
        &self.state.printed
    }

    /// Check that the terminal shows `expected`.
    ///
    /// Compares cells, cursor, title, reverse video and rendition. Row wrap
    /// flags are not compared: a terminal only sets them when output actually
    /// runs past the margin.
    pub fn assert_shows(&self, expected: &Frame) {
        let actual = &self.state.frame;
        assert_eq!(
            (actual.cols(), actual.rows()),
            (expected.cols(), expected.rows()),
            "geometry"
        );
        for row in 0..expected.rows() {
            assert_eq!(
                actual.row(row).cells,
                expected.row(row).cells,
                "row {row} differs"
            );
        }
        assert_eq!(
            self.cursor_position(),
            (expected.cursor.row, expected.cursor.col),
            "cursor position"
        );
        assert_eq!(actual.cursor.visible, expected.cursor.visible, "cursor visibility");
        assert_eq!(actual.title, expected.title, "title");
        assert_eq!(actual.reverse_video, expected.reverse_video, "reverse video");
        assert_eq!(actual.rendition, expected.rendition, "rendition");
    }
}

/// Internal performer that implements vte::Perform.
struct Performer<'a> {
    state: &'a mut ReplayState,
}

impl ReplayState {
    /// Move to the start of the next line, scrolling at the bottom.
    fn line_feed(&mut self) {
        let rows = self.frame.rows();
        if self.frame.cursor.row + 1 >= rows {
            self.frame.scroll_up(1);
        } else {
            self.frame.cursor.row += 1;
        }
    }

    fn erase(&mut self, row: u16, from: u16, count: u16) {
        let blank = Cell::blank(self.frame.rendition);
        let end = from.saturating_add(count).min(self.frame.cols());
        for col in from..end {
            self.frame.set(col, row, blank.clone());
        }
    }

    fn put_char(&mut self, c: char) {
        let cols = self.frame.cols();

        if c.width() == Some(0) {
            self.put_combining(c);
            return;
        }

        if self.pending_wrap {
            let row = self.frame.cursor.row;
            self.frame.row_mut(row).wrap = true;
            self.line_feed();
            self.frame.cursor.col = 0;
            self.pending_wrap = false;
        }

        // A printed space cannot be told apart from an erased cell.
        let cell = if c == ' ' {
            Cell::blank(self.frame.rendition)
        } else {
            Cell::new(c).with_rendition(self.frame.rendition)
        };
        let width = u16::from(cell.width);
        let (row, col) = (self.frame.cursor.row, self.frame.cursor.col);
        self.frame.set(col, row, cell);
        if width == 2 && col + 1 < cols {
            self.frame.set(col + 1, row, Cell::blank(self.frame.rendition));
        }
        self.printed.push((row, col));

        if col + width >= cols {
            self.frame.cursor.col = cols - 1;
            self.pending_wrap = true;
        } else {
            self.frame.cursor.col = col + width;
        }
    }

    /// Attach a combining character to the cell just written.
    fn put_combining(&mut self, c: char) {
        let (row, col) = (self.frame.cursor.row, self.frame.cursor.col);
        let target = if self.pending_wrap {
            col
        } else if col > 0 {
            col - 1
        } else {
            return;
        };

        let cell = self.frame.cell_mut(row, target);
        if cell.contents.chars().eq([COMBINING_BASE]) {
            // The base was only a carrier for a leading combiner.
            cell.contents.clear();
        }
        cell.append(c);
    }
}

impl Perform for Performer<'_> {
    fn print(&mut self, c: char) {
        self.state.put_char(c);
    }

    fn execute(&mut self, byte: u8) {
        let state = &mut self.state;

        match byte {
            0x07 => state.frame.ring_bell(),
            // Line feed without carriage return: the column is kept.
            0x0A => {
                state.pending_wrap = false;
                state.line_feed();
            }
            0x0D => {
                state.pending_wrap = false;
                state.frame.cursor.col = 0;
            }
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], _ignore: bool, action: char) {
        let state = &mut self.state;

        let param0 = params
            .iter()
            .next()
            .and_then(|p| p.first().copied())
            .unwrap_or(0);
        let param1 = params
            .iter()
            .nth(1)
            .and_then(|p| p.first().copied())
            .unwrap_or(0);

        match (action, intermediates) {
            // Cursor Position (CUP)
            ('H', []) => {
                let max_row = state.frame.rows().saturating_sub(1);
                let max_col = state.frame.cols().saturating_sub(1);
                state.frame.cursor.row = param0.max(1).saturating_sub(1).min(max_row);
                state.frame.cursor.col = param1.max(1).saturating_sub(1).min(max_col);
                state.pending_wrap = false;
            }
            // Erase Display (ED), only the whole-screen form
            ('J', []) if param0 == 2 => {
                let rows = state.frame.rows();
                let cols = state.frame.cols();
                for row in 0..rows {
                    state.erase(row, 0, cols);
                    state.frame.row_mut(row).wrap = false;
                }
            }
            // Erase Line (EL) to the right
            ('K', []) if param0 == 0 => {
                let (row, col) = (state.frame.cursor.row, state.frame.cursor.col);
                let cols = state.frame.cols();
                state.erase(row, col, cols);
                state.frame.row_mut(row).wrap = false;
            }
            // Erase Character (ECH)
            ('X', []) => {
                let (row, col) = (state.frame.cursor.row, state.frame.cursor.col);
                state.erase(row, col, param0.max(1));
            }
            ('m', []) => handle_sgr(&mut state.frame.rendition, params),
            ('h', [b'?']) | ('l', [b'?']) => {
                let enable = action == 'h';
                match param0 {
                    5 => state.frame.reverse_video = enable,
                    25 => state.frame.cursor.visible = enable,
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        let Some((cmd, rest)) = params.split_first() else {
            return;
        };

        if matches!(*cmd, b"0" | b"2") {
            let title = rest.join(&b';');
            if let Ok(title) = String::from_utf8(title) {
                self.state.frame.set_title(title);
            }
        }
    }
}

/// Apply an SGR sequence to a rendition.
fn handle_sgr(rendition: &mut Rendition, params: &Params) {
    if params.is_empty() {
        *rendition = Rendition::default();
        return;
    }

    let mut iter = params.iter().flat_map(|p| p.iter().copied());

    while let Some(n) = iter.next() {
        let attrs = &mut rendition.attrs;
        match n {
            0 => *rendition = Rendition::default(),
            1 => attrs.bold = true,
            2 => attrs.faint = true,
            3 => attrs.italic = true,
            4 => attrs.underline = true,
            5 => attrs.blink = true,
            7 => attrs.inverse = true,
            8 => attrs.invisible = true,
            30..=37 => rendition.fg = Color::Indexed((n - 30) as u8),
            39 => rendition.fg = Color::Default,
            40..=47 => rendition.bg = Color::Indexed((n - 40) as u8),
            49 => rendition.bg = Color::Default,
            90..=97 => rendition.fg = Color::Indexed((n - 90 + 8) as u8),
            100..=107 => rendition.bg = Color::Indexed((n - 100 + 8) as u8),
            38 | 48 => {
                let color = match iter.next() {
                    Some(5) => iter.next().map(|idx| Color::Indexed(idx as u8)),
                    Some(2) => {
                        let r = iter.next().unwrap_or(0) as u8;
                        let g = iter.next().unwrap_or(0) as u8;
                        let b = iter.next().unwrap_or(0) as u8;
                        Some(Color::Rgb(r, g, b))
                    }
                    _ => None,
                };
                if let Some(color) = color {
                    if n == 38 {
                        rendition.fg = color;
                    } else {
                        rendition.bg = color;
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_and_wraps() {
        let mut term = ReplayTerminal::new(3, 2);
        term.process(b"abcd");

        assert_eq!(term.frame().cell(0, 2).contents, "c");
        assert_eq!(term.frame().cell(1, 0).contents, "d");
        assert!(term.frame().row(0).wrap);
        assert_eq!(term.cursor_position(), (1, 1));
    }

    #[test]
    fn last_column_leaves_wrap_pending() {
        let mut term = ReplayTerminal::new(3, 2);
        term.process(b"abc");
        assert_eq!(term.frame().cursor.col, 2);
        assert_eq!(term.cursor_position(), (1, 0));

        term.process(b"\x1b[1;1H");
        assert_eq!(term.cursor_position(), (0, 0));
    }

    #[test]
    fn printed_space_is_blank() {
        let mut term = ReplayTerminal::new(3, 1);
        term.process(b"a b");
        assert!(term.frame().cell(0, 1).is_blank());
        assert_eq!(term.printed(), &[(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn line_feed_at_bottom_scrolls() {
        let mut term = ReplayTerminal::new(2, 2);
        term.process(b"a\x1b[2;1Hb\n");
        assert_eq!(term.frame().cell(0, 0).contents, "b");
        assert!(term.frame().cell(1, 0).is_blank());
        assert_eq!(term.frame().cursor.col, 1);
    }

    #[test]
    fn sgr_round_trips_rendition() {
        let attrs = CellAttrs {
            bold: true,
            underline: true,
            ..Default::default()
        };
        let rendition = Rendition::new(Color::Rgb(1, 2, 3), Color::Indexed(9), attrs);
        let mut term = ReplayTerminal::new(2, 1);
        term.process(rendition.sgr().as_bytes());
        assert_eq!(term.frame().rendition, rendition);
    }

    #[test]
    fn erase_sequences_use_active_rendition() {
        let mut term = ReplayTerminal::new(5, 1);
        term.process(b"abcde\x1b[1;2H\x1b[0;41m\x1b[2X");
        let red = Rendition::new(Color::Default, Color::Indexed(1), CellAttrs::default());
        assert_eq!(term.frame().cell(0, 1), &Cell::blank(red));
        assert_eq!(term.frame().cell(0, 3).contents, "d");

        term.process(b"\x1b[K");
        assert!(term.frame().cell(0, 4).is_blank());
    }

    #[test]
    fn title_and_modes() {
        let mut term = ReplayTerminal::new(2, 1);
        term.process(b"\x1b]0;hi there\x1b\\\x1b[?5h\x1b[?25l\x07");
        assert_eq!(term.frame().title, "hi there");
        assert!(term.frame().reverse_video);
        assert!(!term.frame().cursor.visible);
        assert_eq!(term.frame().bell_count, 1);
    }

    #[test]
    fn no_break_space_carries_combiner() {
        let mut term = ReplayTerminal::new(3, 1);
        term.process("\u{a0}\u{301}".as_bytes());
        let cell = term.frame().cell(0, 0);
        assert_eq!(cell.contents, "\u{301}");
        assert!(cell.fallback);
        assert_eq!(cell, &Cell::new('\u{301}'));
    }
}
