//! Serial console sink
//!
//! The kiosk writes its log with `core::fmt::Write` from synchronous code.
//! [`Console`] assembles those writes into lines and queues each complete
//! line for the serial TX task.

use core::fmt;

use defmt::*;

use crate::channels::{Line, LOG_CHANNEL};

/// Line-buffered writer feeding [`LOG_CHANNEL`]
#[derive(Default)]
pub struct Console {
    line: Line,
    /// Set once the current line overflowed; the tail is dropped
    truncated: bool,
}

impl Console {
    pub const fn new() -> Self {
        Self {
            line: Line::new(),
            truncated: false,
        }
    }

    fn flush_line(&mut self) {
        let line = core::mem::take(&mut self.line);
        self.truncated = false;
        // Never block the kiosk loop on a slow host
        if LOG_CHANNEL.try_send(line).is_err() {
            warn!("Log channel full, dropping line");
        }
    }
}

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            match c {
                '\n' => self.flush_line(),
                '\r' => {}
                c => {
                    if !self.truncated && self.line.push(c).is_err() {
                        self.truncated = true;
                    }
                }
            }
        }
        Ok(())
    }
}
