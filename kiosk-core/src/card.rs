//! RFID card identifiers
//!
//! A UID is 4, 7 or 10 bytes depending on the card cascade level. It is
//! rendered as uppercase hex with every byte zero-padded to two digits; the
//! external authentication process matches on that exact form.

use core::fmt;

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest UID an ISO 14443A card can report (triple size)
pub const MAX_UID_LEN: usize = 10;

/// Hex rendering capacity
pub const MAX_UID_HEX_LEN: usize = MAX_UID_LEN * 2;

/// Errors building a UID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UidError {
    /// No bytes given
    Empty,
    /// More than [`MAX_UID_LEN`] bytes
    TooLong,
    /// Hex text with a bad digit or odd length
    InvalidHex,
}

/// Card UID
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Uid {
    bytes: Vec<u8, MAX_UID_LEN>,
}

impl Uid {
    /// Build a UID from raw bytes
    pub fn new(bytes: &[u8]) -> Result<Self, UidError> {
        if bytes.is_empty() {
            return Err(UidError::Empty);
        }
        let bytes = Vec::from_slice(bytes).map_err(|_| UidError::TooLong)?;
        Ok(Self { bytes })
    }

    /// Parse a UID from hex text, e.g. `"0496C72B"` (case-insensitive)
    pub fn parse_hex(text: &str) -> Result<Self, UidError> {
        let text = text.trim().as_bytes();
        if text.len() % 2 != 0 {
            return Err(UidError::InvalidHex);
        }
        if text.len() > MAX_UID_HEX_LEN {
            return Err(UidError::TooLong);
        }

        let mut bytes: Vec<u8, MAX_UID_LEN> = Vec::new();
        for pair in text.chunks(2) {
            let byte = (hex_digit(pair[0])? << 4) | hex_digit(pair[1])?;
            bytes.push(byte).map_err(|_| UidError::TooLong)?;
        }
        Self::new(&bytes)
    }

    /// Raw UID bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Uppercase, zero-padded hex form
    pub fn to_hex(&self) -> String<MAX_UID_HEX_LEN> {
        let mut out = String::new();
        // Capacity is exactly two digits per byte
        let _ = fmt::write(&mut out, format_args!("{}", self));
        out
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

fn hex_digit(c: u8) -> Result<u8, UidError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(UidError::InvalidHex),
    }
}
