//! Escape sequences and geometry limits for qsh-display.

// =============================================================================
// Geometry Constants
// =============================================================================

/// Maximum terminal columns.
pub const MAX_TERMINAL_COLS: u16 = 500;

/// Maximum terminal rows.
pub const MAX_TERMINAL_ROWS: u16 = 200;

/// Default terminal columns.
pub const DEFAULT_COLS: u16 = 80;

/// Default terminal rows.
pub const DEFAULT_ROWS: u16 = 24;

// =============================================================================
// Control Sequences
// =============================================================================

/// Audible bell (BEL).
pub const BELL: &str = "\x07";

/// Start of the set-window-title OSC (icon name and title).
pub const OSC_TITLE_START: &str = "\x1b]0;";

/// String terminator (ST) closing an OSC.
pub const STRING_TERMINATOR: &str = "\x1b\\";

/// DECSET 5: reverse video on.
pub const REVERSE_VIDEO_ON: &str = "\x1b[?5h";

/// DECRST 5: reverse video off.
pub const REVERSE_VIDEO_OFF: &str = "\x1b[?5l";

/// Reset renditions, home the cursor, erase the display.
pub const CLEAR_SCREEN: &str = "\x1b[0m\x1b[H\x1b[2J";

/// DECTCEM: show cursor.
pub const CURSOR_SHOW: &str = "\x1b[?25h";

/// DECTCEM: hide cursor.
pub const CURSOR_HIDE: &str = "\x1b[?25l";

/// EL 0: erase from the cursor to the end of the line.
pub const ERASE_TO_EOL: &str = "\x1b[K";

/// ECH with an elided count of one.
pub const ERASE_ONE_CHAR: &str = "\x1b[X";

/// SGR 0: reset every rendition.
pub const SGR_RESET: &str = "\x1b[0m";

/// No-break space used as a base for a leading combining character.
pub const COMBINING_BASE: char = '\u{a0}';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_screen_starts_with_sgr_reset() {
        assert!(CLEAR_SCREEN.starts_with(SGR_RESET));
    }

    #[test]
    fn default_size_fits_limits() {
        assert!(DEFAULT_COLS <= MAX_TERMINAL_COLS);
        assert!(DEFAULT_ROWS <= MAX_TERMINAL_ROWS);
    }

    #[test]
    fn combining_base_is_two_utf8_bytes() {
        let mut buf = [0u8; 4];
        assert_eq!(COMBINING_BASE.encode_utf8(&mut buf).as_bytes(), b"\xC2\xA0");
    }
}
