//! Frame types for qsh-display.
//!
//! This module provides:
//! - Rendition (colors and attributes, serializable to SGR)
//! - Cell representation (contents, width, combining fallback)
//! - Rows with their line-wrap flag
//! - Complete frame snapshots with cursor and window attributes

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use crate::constants::{DEFAULT_COLS, DEFAULT_ROWS, MAX_TERMINAL_COLS, MAX_TERMINAL_ROWS};
use crate::error::{Error, Result};

// =============================================================================
// Color Types
// =============================================================================

/// Terminal color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Color {
    /// Default foreground/background color.
    #[default]
    Default,
    /// 256-color palette index (0-15 are the standard/bright colors).
    Indexed(u8),
    /// 24-bit RGB color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Append SGR parameters selecting this color, each prefixed with `;`.
    fn write_sgr_params(self, out: &mut String, foreground: bool) {
        let (base, bright_base, extended) = if foreground {
            (30, 90, 38)
        } else {
            (40, 100, 48)
        };

        match self {
            Color::Default => {}
            Color::Indexed(n) if n < 8 => {
                let _ = write!(out, ";{}", base + u16::from(n));
            }
            Color::Indexed(n) if n < 16 => {
                let _ = write!(out, ";{}", bright_base + u16::from(n) - 8);
            }
            Color::Indexed(n) => {
                let _ = write!(out, ";{extended};5;{n}");
            }
            Color::Rgb(r, g, b) => {
                let _ = write!(out, ";{extended};2;{r};{g};{b}");
            }
        }
    }
}

// =============================================================================
// Cell Attributes
// =============================================================================

/// Cell display attributes (bold, italic, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellAttrs {
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub inverse: bool,
    pub invisible: bool,
}

impl CellAttrs {
    /// Returns true if all attributes are default (off).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Rendition
// =============================================================================

/// Complete text style: colors plus attributes.
///
/// Renditions are always serialized as an absolute SGR that begins with a
/// reset, so emitting one fully determines the terminal's style regardless of
/// what was active before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rendition {
    pub fg: Color,
    pub bg: Color,
    pub attrs: CellAttrs,
}

impl Rendition {
    /// Create a rendition from its parts.
    pub fn new(fg: Color, bg: Color, attrs: CellAttrs) -> Self {
        Self { fg, bg, attrs }
    }

    /// Returns true if this is the terminal's power-on rendition.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Serialize as a single `ESC [ 0 ; ... m` sequence.
    pub fn sgr(&self) -> String {
        let mut out = String::from("\x1b[0");
        let flags = [
            (self.attrs.bold, 1),
            (self.attrs.faint, 2),
            (self.attrs.italic, 3),
            (self.attrs.underline, 4),
            (self.attrs.blink, 5),
            (self.attrs.inverse, 7),
            (self.attrs.invisible, 8),
        ];
        for (_, code) in flags.iter().filter(|(on, _)| *on) {
            let _ = write!(out, ";{code}");
        }
        self.fg.write_sgr_params(&mut out, true);
        self.bg.write_sgr_params(&mut out, false);
        out.push('m');
        out
    }
}

// =============================================================================
// Cell
// =============================================================================

/// A single terminal cell.
///
/// Empty `contents` means the cell is blank, whatever its rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Base character followed by any combining characters.
    pub contents: String,
    /// Display width in columns (1 or 2).
    pub width: u8,
    /// Set when the first character is a combining mark that needs a
    /// placeholder base when drawn.
    pub fallback: bool,
    /// Style of this cell.
    pub rendition: Rendition,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Rendition::default())
    }
}

impl Cell {
    /// Create a blank cell carrying a rendition (for background color erase).
    pub fn blank(rendition: Rendition) -> Self {
        Self {
            contents: String::new(),
            width: 1,
            fallback: false,
            rendition,
        }
    }

    /// Create a cell from a single character with default styling.
    ///
    /// The width comes from the character's East Asian width. A zero-width
    /// character (a combining mark with no base) becomes a one-column
    /// fallback cell.
    pub fn new(ch: char) -> Self {
        let (width, fallback) = match ch.width() {
            Some(0) => (1, true),
            Some(2) => (2, false),
            _ => (1, false),
        };
        Self {
            contents: ch.to_string(),
            width,
            fallback,
            rendition: Rendition::default(),
        }
    }

    /// Create a cell with explicit contents and width.
    pub fn with_width(contents: impl Into<String>, width: u8) -> Result<Self> {
        if !(1..=2).contains(&width) {
            return Err(Error::InvalidCellWidth(width));
        }
        Ok(Self {
            contents: contents.into(),
            width,
            fallback: false,
            rendition: Rendition::default(),
        })
    }

    /// Replace the rendition.
    pub fn with_rendition(mut self, rendition: Rendition) -> Self {
        self.rendition = rendition;
        self
    }

    /// Check if this cell has no contents.
    pub fn is_blank(&self) -> bool {
        self.contents.is_empty()
    }

    /// Attach a combining character to this cell.
    ///
    /// On a blank cell the character becomes a fallback cell of its own.
    pub fn append(&mut self, ch: char) {
        if self.contents.is_empty() {
            self.fallback = true;
        }
        self.contents.push(ch);
    }

    /// Blank the cell with the given rendition.
    pub fn reset(&mut self, rendition: Rendition) {
        *self = Self::blank(rendition);
    }
}

// =============================================================================
// Row
// =============================================================================

/// One line of cells and whether it wrapped into the next line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// The line continued onto the next one through automatic wrap.
    pub wrap: bool,
}

impl Row {
    /// Create a blank row.
    pub fn new(cols: u16, rendition: Rendition) -> Self {
        Self {
            cells: vec![Cell::blank(rendition); usize::from(cols)],
            wrap: false,
        }
    }

    /// Blank every cell and clear the wrap flag.
    pub fn reset(&mut self, rendition: Rendition) {
        for cell in &mut self.cells {
            cell.reset(rendition);
        }
        self.wrap = false;
    }

    /// Get a cell by column.
    pub fn cell(&self, col: u16) -> &Cell {
        &self.cells[usize::from(col)]
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Cursor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub row: u16,
    pub col: u16,
    pub visible: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            row: 0,
            col: 0,
            visible: true,
        }
    }
}

// =============================================================================
// Frame
// =============================================================================

/// A complete snapshot of what a terminal should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    rows: Vec<Row>,
    cols: u16,
    /// Cursor position and visibility.
    pub cursor: Cursor,
    /// Rendition in effect for subsequent output.
    pub rendition: Rendition,
    /// DECSCNM reverse video.
    pub reverse_video: bool,
    /// Window title (OSC 0).
    pub title: String,
    /// Number of times the bell has rung.
    pub bell_count: u64,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(DEFAULT_COLS, DEFAULT_ROWS)
    }
}

impl Frame {
    /// Create a blank frame with given dimensions.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            rows: vec![Row::new(cols, Rendition::default()); usize::from(rows)],
            cols,
            cursor: Cursor::default(),
            rendition: Rendition::default(),
            reverse_video: false,
            title: String::new(),
            bell_count: 0,
        }
    }

    /// Create a blank frame, rejecting empty or oversized geometry.
    pub fn try_new(cols: u16, rows: u16) -> Result<Self> {
        if cols == 0 || rows == 0 || cols > MAX_TERMINAL_COLS || rows > MAX_TERMINAL_ROWS {
            return Err(Error::InvalidGeometry { cols, rows });
        }
        Ok(Self::new(cols, rows))
    }

    /// Get frame width in columns.
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Get frame height in rows.
    pub fn rows(&self) -> u16 {
        // Row count is bounded by the u16 passed at construction.
        self.rows.len() as u16
    }

    /// Get a row.
    pub fn row(&self, row: u16) -> &Row {
        &self.rows[usize::from(row)]
    }

    /// Get a mutable row.
    pub fn row_mut(&mut self, row: u16) -> &mut Row {
        &mut self.rows[usize::from(row)]
    }

    /// Get a cell by (row, col); panics when out of range.
    pub fn cell(&self, row: u16, col: u16) -> &Cell {
        self.row(row).cell(col)
    }

    /// Get a mutable cell by (row, col); panics when out of range.
    pub fn cell_mut(&mut self, row: u16, col: u16) -> &mut Cell {
        &mut self.row_mut(row).cells[usize::from(col)]
    }

    /// Get a cell by position.
    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        self.rows
            .get(usize::from(row))
            .and_then(|r| r.cells.get(usize::from(col)))
    }

    /// Set a cell at position. Out-of-range positions are ignored.
    pub fn set(&mut self, col: u16, row: u16, cell: Cell) {
        if let Some(slot) = self
            .rows
            .get_mut(usize::from(row))
            .and_then(|r| r.cells.get_mut(usize::from(col)))
        {
            *slot = cell;
        }
    }

    /// Blank a cell the way an erase under `rendition` leaves it.
    pub fn reset_cell(&mut self, row: u16, col: u16, rendition: Rendition) {
        self.cell_mut(row, col).reset(rendition);
    }

    /// Record a bell.
    pub fn ring_bell(&mut self) {
        self.bell_count += 1;
    }

    /// Set the window title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Scroll the whole frame up by `n` lines.
    ///
    /// Row `i` takes the contents of row `i + n`; the `n` rows exposed at the
    /// bottom become blank with the default rendition.
    pub fn scroll_up(&mut self, n: u16) {
        let n = usize::from(n).min(self.rows.len());
        self.rows.rotate_left(n);
        let height = self.rows.len();
        for row in &mut self.rows[height - n..] {
            row.reset(Rendition::default());
        }
    }

    /// Resize the frame, preserving content where possible.
    pub fn resize(&mut self, new_cols: u16, new_rows: u16) {
        for row in &mut self.rows {
            row.cells.resize(usize::from(new_cols), Cell::default());
            if new_cols < self.cols {
                row.wrap = false;
            }
        }
        self.rows
            .resize(usize::from(new_rows), Row::new(new_cols, Rendition::default()));
        self.cols = new_cols;
        self.cursor.row = self.cursor.row.min(new_rows.saturating_sub(1));
        self.cursor.col = self.cursor.col.min(new_cols.saturating_sub(1));
    }
}

// =============================================================================
// Tests
// =============================================================================
