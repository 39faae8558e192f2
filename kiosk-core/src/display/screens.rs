//! Screen layouts for each display state

use super::frame::{line_fmt, Frame, Line};
use crate::card::Uid;
use crate::config::{ThinkingConfig, WelcomePage};

/// One page of the welcome sequence
pub fn welcome(page: &WelcomePage) -> Frame {
    Frame::from_lines(&page.top, &page.bottom)
}

/// Authentication prompt
pub fn awaiting_auth() -> Frame {
    Frame::from_lines("Please Scan Card", "to Authenticate")
}

/// Rejected card
pub fn auth_failure() -> Frame {
    Frame::from_lines("Access Denied", "Unknown Card")
}

/// Idle screen with the current angle
pub fn idle(angle: i32) -> Frame {
    let mut frame = Frame::new();
    frame.set_line(0, &line_fmt(format_args!("Angle: {} deg", angle)));
    frame.set_line(1, "Status: Ready");
    frame
}

/// Full thinking screen: static text followed by the given animation frame
pub fn thinking(config: &ThinkingConfig, frame_index: usize) -> Frame {
    let (_, field) = thinking_field(config, frame_index);
    let mut frame = Frame::new();
    frame.set_line(0, &line_fmt(format_args!("{}{}", config.text, field)));
    frame
}

/// Animation field only: column where it starts and its padded text
///
/// Frames are padded to the widest frame so a shorter frame fully
/// overwrites a longer one.
pub fn thinking_field(config: &ThinkingConfig, frame_index: usize) -> (u8, Line) {
    let width = config.frames.iter().map(|f| f.len()).max().unwrap_or(0);
    let text = config
        .frames
        .get(frame_index)
        .map(|f| f.as_str())
        .unwrap_or("");
    let col = config.text.len().min(super::LCD_COLS) as u8;
    (col, line_fmt(format_args!("{:<width$}", text, width = width)))
}

/// Card scanned while idle
pub fn card_scanned(uid: &Uid) -> Frame {
    let mut frame = Frame::new();
    frame.set_line(0, "Card Scanned!");
    frame.set_line(1, &line_fmt(format_args!("UID: {}", uid)));
    frame
}

/// Shutdown message
pub fn shutdown() -> Frame {
    Frame::from_lines("Shutting Down...", "Goodbye!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KioskConfig;

    #[test]
    fn test_idle_screen() {
        let frame = idle(90);
        assert_eq!(frame.line(0), "Angle: 90 deg");
        assert_eq!(frame.line(1), "Status: Ready");
    }

    #[test]
    fn test_card_scanned_truncates_long_uid() {
        let uid = Uid::new(&[0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x80]).unwrap();
        let frame = card_scanned(&uid);
        assert_eq!(frame.line(0), "Card Scanned!");
        assert_eq!(frame.line(1), "UID: 04112233445");
    }

    #[test]
    fn test_thinking_screen_and_field() {
        let config = KioskConfig::default();
        let frame = thinking(&config.thinking, 0);
        assert_eq!(frame.line(0), "Thinking.  ");
        assert_eq!(frame.line(1), "");

        let (col, field) = thinking_field(&config.thinking, 3);
        assert_eq!(col, 8);
        assert_eq!(field.as_str(), "   ");
    }
}
