//! Error types for qsh-display.
//!
//! Frame transitions themselves never fail; errors only come from building
//! frames with impossible geometry and from logging setup.

use thiserror::Error;

/// Main error type for qsh-display operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from underlying system calls.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame dimensions are zero or exceed the supported maximum.
    #[error("invalid geometry: {cols}x{rows}")]
    InvalidGeometry { cols: u16, rows: u16 },

    /// Cell display width other than 1 or 2.
    #[error("invalid cell width: {0}")]
    InvalidCellWidth(u8),
}

/// Convenience result type for qsh-display operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_geometry() {
        let err = Error::InvalidGeometry { cols: 0, rows: 24 };
        assert_eq!(err.to_string(), "invalid geometry: 0x24");
    }

    #[test]
    fn error_display_invalid_cell_width() {
        let err = Error::InvalidCellWidth(3);
        assert_eq!(err.to_string(), "invalid cell width: 3");
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
