//! Frame builders for tests.

use qsh_display::terminal::{Cell, Frame, Rendition};

/// Write `text` into `frame` starting at (row, col) with one rendition.
///
/// Double-width characters take two columns; the column they cover is
/// blanked with the same rendition, as a terminal would. Spaces become
/// blank cells and characters that would not fit are dropped.
///
/// Returns the column after the last character written.
pub fn write_text(frame: &mut Frame, row: u16, col: u16, text: &str, rendition: Rendition) -> u16 {
    let cols = frame.cols();
    let mut col = col;
    for ch in text.chars() {
        let cell = if ch == ' ' {
            Cell::blank(rendition)
        } else {
            Cell::new(ch).with_rendition(rendition)
        };
        let width = u16::from(cell.width);
        if col + width > cols {
            break;
        }
        frame.set(col, row, cell);
        if width == 2 {
            frame.set(col + 1, row, Cell::blank(rendition));
        }
        col += width;
    }
    col
}

/// Build a frame whose rows start with the given lines of default-styled text.
pub fn text_frame(cols: u16, rows: u16, lines: &[&str]) -> Frame {
    let mut frame = Frame::new(cols, rows);
    for (row, line) in lines.iter().enumerate().take(usize::from(rows)) {
        write_text(&mut frame, row as u16, 0, line, Rendition::default());
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_frame_places_lines() {
        let frame = text_frame(4, 3, &["a b", "", "cd"]);
        assert!(frame.cell(0, 1).is_blank());
        assert_eq!(frame.cell(0, 2).contents, "b");
        assert!(frame.cell(1, 0).is_blank());
        assert_eq!(frame.cell(2, 0).contents, "c");
    }

    #[test]
    fn wide_chars_cover_two_columns() {
        let mut frame = Frame::new(5, 1);
        let end = write_text(&mut frame, 0, 0, "中x", Rendition::default());
        assert_eq!(end, 3);
        assert_eq!(frame.cell(0, 0).width, 2);
        assert!(frame.cell(0, 1).is_blank());
        assert_eq!(frame.cell(0, 2).contents, "x");
    }

    #[test]
    fn overflow_is_dropped() {
        let mut frame = Frame::new(3, 1);
        let end = write_text(&mut frame, 0, 1, "中中", Rendition::default());
        assert_eq!(end, 3);
        assert_eq!(frame.cell(0, 1).contents, "中");
    }
}
