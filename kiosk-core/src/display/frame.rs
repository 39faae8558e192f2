//! Two-line frame buffer
//!
//! The kiosk has a 16x2 character LCD. Every screen is composed into a
//! [`Frame`] first; text that does not fit is cut at the column limit before
//! anything reaches the display.

use core::fmt;

use heapless::String;

/// Display width in characters
pub const LCD_COLS: usize = 16;

/// Display height in rows
pub const LCD_ROWS: usize = 2;

/// One display row
pub type Line = String<LCD_COLS>;

/// Build a line from text, cutting it at the column limit
pub fn line(text: &str) -> Line {
    let mut out = Line::new();
    push_truncated(&mut out, text);
    out
}

/// Build a line from format arguments, cutting it at the column limit
pub fn line_fmt(args: fmt::Arguments<'_>) -> Line {
    let mut out = Line::new();
    // Truncating never reports an error
    let _ = fmt::write(&mut Truncating(&mut out), args);
    out
}

fn push_truncated(out: &mut Line, text: &str) {
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
}

/// `fmt::Write` adapter that drops whatever does not fit
struct Truncating<'a>(&'a mut Line);

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        push_truncated(self.0, s);
        Ok(())
    }
}

/// Contents of both display rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    lines: [Line; LCD_ROWS],
}

impl Frame {
    /// Create an empty frame
    pub const fn new() -> Self {
        Self {
            lines: [String::new(), String::new()],
        }
    }

    /// Create a frame from two rows of text
    pub fn from_lines(top: &str, bottom: &str) -> Self {
        Self {
            lines: [line(top), line(bottom)],
        }
    }

    /// Replace a row; rows past the bottom are ignored
    pub fn set_line(&mut self, row: usize, text: &str) {
        if let Some(slot) = self.lines.get_mut(row) {
            *slot = line(text);
        }
    }

    /// Text of a row (empty past the bottom)
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(|l| l.as_str()).unwrap_or("")
    }

    /// Iterate rows top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.as_str())
    }

    /// Clear both rows
    pub fn clear(&mut self) {
        for l in &mut self.lines {
            l.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_line_truncates_at_sixteen() {
        let l = line("Card detected for auth!");
        assert_eq!(l.as_str(), "Card detected fo");
    }

    #[test]
    fn test_line_fmt_truncates() {
        let l = line_fmt(format_args!("UID: {}", "04112233445580"));
        assert_eq!(l.as_str(), "UID: 04112233445");
    }

    #[test]
    fn test_frame_rows() {
        let mut frame = Frame::from_lines("Angle: 90 deg", "Status: Ready");
        assert_eq!(frame.line(0), "Angle: 90 deg");
        assert_eq!(frame.line(1), "Status: Ready");
        assert_eq!(frame.line(2), "");

        frame.set_line(5, "ignored");
        frame.set_line(1, "Status: Busy");
        assert_eq!(frame.line(1), "Status: Busy");

        frame.clear();
        assert!(frame.lines().all(str::is_empty));
    }

    proptest! {
        #[test]
        fn prop_lines_never_exceed_width(text in "[ -~]{0,64}") {
            let l = line(&text);
            prop_assert!(l.len() <= LCD_COLS);
            prop_assert!(text.starts_with(l.as_str()));
        }
    }
}
