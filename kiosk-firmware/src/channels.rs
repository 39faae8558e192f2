//! Inter-task communication channels
//!
//! Defines the static channels used between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;

use kiosk_core::command::Command;

/// Longest serial line carried in either direction
pub const LINE_LEN: usize = 64;

/// Channel capacity for host commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for outgoing log lines
const LOG_CHANNEL_SIZE: usize = 8;

/// A single line of serial text, without its terminator
pub type Line = String<LINE_LEN>;

/// Commands decoded from the host serial link
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Log lines queued for the host serial link
pub static LOG_CHANNEL: Channel<CriticalSectionRawMutex, Line, LOG_CHANNEL_SIZE> = Channel::new();
