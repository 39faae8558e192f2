//! Host command decoding
//!
//! The host sends one command per line. A line is one of:
//! - a control word: `THINKING_START`, `IDLE_STATE`, `RESET_STATE`, `SHUTDOWN_CMD`
//! - an action with an optional integer argument: `spin 3`, `nod`
//! - a bare integer, shorthand for `goto <angle>`

use heapless::{String, Vec};

/// Longest action name kept from a command line
pub const MAX_ACTION_NAME_LEN: usize = 12;

/// Longest command line accepted from the host
pub const MAX_LINE_LEN: usize = 64;

/// Action name and argument, not yet resolved against the known actions
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActionRequest {
    /// Action name as sent by the host
    pub name: String<MAX_ACTION_NAME_LEN>,
    /// Integer argument (1 when omitted)
    pub argument: i32,
}

impl ActionRequest {
    /// Build a request; names longer than [`MAX_ACTION_NAME_LEN`] are cut
    pub fn new(name: &str, argument: i32) -> Self {
        let mut stored = String::new();
        for c in name.chars() {
            if stored.push(c).is_err() {
                break;
            }
        }
        Self {
            name: stored,
            argument,
        }
    }
}

/// Decoded host command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Run a named action
    Action(ActionRequest),
    /// Host started working out a command
    ThinkingStart,
    /// Host went back to idle
    IdleState,
    /// Drop the session and require a new card
    Reset,
    /// Show the shutdown message
    Shutdown,
}

impl Command {
    /// Decode one line from the host
    ///
    /// Returns `None` for blank lines and for an argument that is not an
    /// integer. Unknown action names are kept; the dispatcher reports them.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        match line {
            "" => return None,
            "THINKING_START" => return Some(Command::ThinkingStart),
            "IDLE_STATE" => return Some(Command::IdleState),
            "RESET_STATE" => return Some(Command::Reset),
            "SHUTDOWN_CMD" => return Some(Command::Shutdown),
            _ => {}
        }

        // Bare angle
        if let Ok(angle) = line.parse::<i32>() {
            return Some(Command::Action(ActionRequest::new("goto", angle)));
        }

        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let argument = match parts.next() {
            Some(arg) => arg.parse::<i32>().ok()?,
            None => 1,
        };
        if parts.next().is_some() {
            return None;
        }

        Some(Command::Action(ActionRequest::new(name, argument)))
    }
}

/// Line assembly errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_LINE_LEN`]; it is skipped up to the next newline
    TooLong,
    /// Line is not valid UTF-8
    InvalidUtf8,
    /// Line is not a command
    Malformed,
}

/// Byte-at-a-time command line parser
///
/// Lines end with `\n`; a preceding `\r` is trimmed along with other
/// whitespace. Blank lines are skipped silently.
pub struct LineParser {
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// Discarding the rest of an overlong line
    skipping: bool,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new parser
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            skipping: false,
        }
    }

    /// Reset parser state, dropping any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.skipping = false;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(command))` at the end of a command line, `Ok(None)`
    /// when more bytes are needed, or `Err` for a line that was dropped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Command>, LineError> {
        if byte != b'\n' {
            if self.skipping {
                return Ok(None);
            }
            if self.buffer.push(byte).is_err() {
                self.buffer.clear();
                self.skipping = true;
                return Err(LineError::TooLong);
            }
            return Ok(None);
        }

        if self.skipping {
            self.skipping = false;
            return Ok(None);
        }

        let result = match core::str::from_utf8(&self.buffer) {
            Ok(line) if line.trim().is_empty() => Ok(None),
            Ok(line) => Command::parse(line).map(Some).ok_or(LineError::Malformed),
            Err(_) => Err(LineError::InvalidUtf8),
        };
        self.buffer.clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut LineParser, bytes: &[u8]) -> Vec<Result<Command, LineError>, 8> {
        let mut out = Vec::new();
        for &byte in bytes {
            match parser.feed(byte) {
                Ok(Some(command)) => out.push(Ok(command)).unwrap(),
                Ok(None) => {}
                Err(e) => out.push(Err(e)).unwrap(),
            }
        }
        out
    }

    fn action(name: &str, argument: i32) -> Option<Command> {
        Some(Command::Action(ActionRequest::new(name, argument)))
    }

    #[test]
    fn test_control_words() {
        assert_eq!(Command::parse("THINKING_START"), Some(Command::ThinkingStart));
        assert_eq!(Command::parse("IDLE_STATE\r"), Some(Command::IdleState));
        assert_eq!(Command::parse("RESET_STATE"), Some(Command::Reset));
        assert_eq!(Command::parse(" SHUTDOWN_CMD "), Some(Command::Shutdown));
    }

    #[test]
    fn test_bare_integer_is_goto() {
        assert_eq!(Command::parse("45"), action("goto", 45));
        assert_eq!(Command::parse("-10"), action("goto", -10));
    }

    #[test]
    fn test_named_actions() {
        assert_eq!(Command::parse("spin 3"), action("spin", 3));
        assert_eq!(Command::parse("goto   120"), action("goto", 120));
        assert_eq!(Command::parse("nod"), action("nod", 1));
        assert_eq!(Command::parse("dance 2"), action("dance", 2));
    }

    #[test]
    fn test_rejects_malformed_lines() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("spin fast"), None);
        assert_eq!(Command::parse("spin 1 2"), None);
    }

    #[test]
    fn test_long_name_is_cut() {
        let Some(Command::Action(request)) = Command::parse("supercalifragilistic 1") else {
            panic!("expected action");
        };
        assert_eq!(request.name.as_str(), "supercalifra");
    }

    #[test]
    fn test_line_parser_splits_lines() {
        let mut parser = LineParser::new();
        let out = feed_all(&mut parser, b"spin 2\r\n\r\nTHINKING_START\n90");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Ok(Command::Action(ActionRequest::new("spin", 2))));
        assert_eq!(out[1], Ok(Command::ThinkingStart));

        // Partial line completes on the next newline
        let out = feed_all(&mut parser, b"\n");
        assert_eq!(out[0], Ok(Command::Action(ActionRequest::new("goto", 90))));
    }

    #[test]
    fn test_line_parser_reports_malformed() {
        let mut parser = LineParser::new();
        let out = feed_all(&mut parser, b"spin fast\n\xff\xfe\nnod\n");
        assert_eq!(out[0], Err(LineError::Malformed));
        assert_eq!(out[1], Err(LineError::InvalidUtf8));
        assert_eq!(out[2], Ok(Command::Action(ActionRequest::new("nod", 1))));
    }

    #[test]
    fn test_line_parser_skips_overlong_line() {
        let mut parser = LineParser::new();
        let mut bytes: Vec<u8, 128> = Vec::new();
        for _ in 0..MAX_LINE_LEN + 10 {
            bytes.push(b'x').unwrap();
        }
        bytes.extend_from_slice(b"\nIDLE_STATE\n").unwrap();

        let out = feed_all(&mut parser, &bytes);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], Err(LineError::TooLong));
        assert_eq!(out[1], Ok(Command::IdleState));
    }
}
