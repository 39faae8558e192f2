//! Character display trait

/// Errors that can occur writing to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus or pin write failed
    Communication,
    /// Row or column outside the display
    InvalidPosition,
}

/// Trait for a row/column addressed text display
///
/// The display is a stateless sink apart from its cursor. Callers are
/// responsible for fitting text to the row; implementations may reject
/// positions outside the panel.
pub trait CharDisplay {
    /// Clear every cell and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Write text starting at a position
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number (0-based)
    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;
}

impl<T: CharDisplay + ?Sized> CharDisplay for &mut T {
    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        (**self).write_at(row, col, text)
    }
}
