//! Screen composition for the 16x2 character display
//!
//! Screens are built into a fixed-capacity [`Frame`] and then pushed to a
//! [`CharDisplay`]. State entry does a full redraw; periodic animation ticks
//! rewrite a single field.

pub mod frame;
pub mod screens;

pub use frame::{line, line_fmt, Frame, Line, LCD_COLS, LCD_ROWS};

use crate::traits::{CharDisplay, DisplayError};

/// Drawing helpers for every [`CharDisplay`]
pub trait DisplayExt: CharDisplay {
    /// Clear the display and draw both rows of a frame
    fn draw_frame(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.clear()?;
        for (row, text) in frame.lines().enumerate() {
            if !text.is_empty() {
                self.write_at(row as u8, 0, text)?;
            }
        }
        Ok(())
    }

    /// Overwrite one field without clearing the rest of the display
    fn draw_field(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let room = LCD_COLS.saturating_sub(col as usize);
        let end = text
            .char_indices()
            .nth(room)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        self.write_at(row, col, &text[..end])
    }
}

// Blanket implementation for all CharDisplay types
impl<T: CharDisplay + ?Sized> DisplayExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::{String, Vec};

    #[derive(Default)]
    struct Recorder {
        clears: usize,
        writes: Vec<(u8, u8, String<32>), 8>,
    }

    impl CharDisplay for Recorder {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.clears += 1;
            Ok(())
        }

        fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
            let _ = self.writes.push((row, col, String::try_from(text).unwrap()));
            Ok(())
        }
    }

    #[test]
    fn test_draw_frame_clears_then_writes_rows() {
        let mut display = Recorder::default();
        display
            .draw_frame(&Frame::from_lines("Action: Nod", "Times: 2"))
            .unwrap();
        assert_eq!(display.clears, 1);
        assert_eq!(display.writes.len(), 2);
        assert_eq!(display.writes[0].2.as_str(), "Action: Nod");
        assert_eq!((display.writes[1].0, display.writes[1].1), (1, 0));
    }

    #[test]
    fn test_draw_field_clips_to_remaining_columns() {
        let mut display = Recorder::default();
        display.draw_field(0, 14, "...").unwrap();
        assert_eq!(display.clears, 0);
        assert_eq!(display.writes[0].2.as_str(), "..");
    }
}
