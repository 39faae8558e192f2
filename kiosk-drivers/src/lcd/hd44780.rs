//! HD44780 character LCD driver
//!
//! Drives a 16x2 HD44780-compatible module over the 4-bit parallel
//! interface (RS, E, D4-D7; RW tied low). Timing uses a blocking delay, so
//! the busy flag is never read.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use kiosk_core::display::{LCD_COLS, LCD_ROWS};
use kiosk_core::traits::{CharDisplay, DisplayError};

/// HD44780 commands
#[allow(dead_code)]
mod cmd {
    pub const CLEAR_DISPLAY: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    pub const ENTRY_MODE_SET: u8 = 0x04;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_DDRAM_ADDR: u8 = 0x80;

    // Entry mode flags
    pub const ENTRY_INCREMENT: u8 = 0x02;

    // Display control flags
    pub const DISPLAY_ON: u8 = 0x04;
    pub const CURSOR_ON: u8 = 0x02;
    pub const BLINK_ON: u8 = 0x01;

    // Function set flags
    pub const TWO_LINES: u8 = 0x08;
}

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; LCD_ROWS] = [0x00, 0x40];

/// Printed in place of characters outside the ROM's ASCII range
const REPLACEMENT: u8 = b'?';

/// HD44780 in 4-bit mode
///
/// All six lines share one pin type, which is what HALs with type-erased
/// outputs hand out.
pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    /// D4..D7
    data: [P; 4],
    delay: D,
}

impl<P, D> Hd44780<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Create a driver; call [`Hd44780::init`] before writing
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Self {
        Self {
            rs,
            en,
            data,
            delay,
        }
    }

    /// Run the power-on initialization sequence
    ///
    /// Leaves the display on, cursor hidden, cleared, writing left to right.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        // Wait for Vcc to settle
        self.delay.delay_ms(50);
        self.set_rs(false)?;
        self.set_en(false)?;

        // Force 8-bit mode three times, then switch to 4-bit
        self.write_nibble(0x03)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02)?;

        self.command(cmd::FUNCTION_SET | cmd::TWO_LINES)?;
        self.command(cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON)?;
        self.clear()?;
        self.command(cmd::ENTRY_MODE_SET | cmd::ENTRY_INCREMENT)
    }

    /// Release the pins and delay
    pub fn release(self) -> (P, P, [P; 4], D) {
        (self.rs, self.en, self.data, self.delay)
    }

    fn set_rs(&mut self, high: bool) -> Result<(), DisplayError> {
        set_pin(&mut self.rs, high)
    }

    fn set_en(&mut self, high: bool) -> Result<(), DisplayError> {
        set_pin(&mut self.en, high)
    }

    /// Put a nibble on D4-D7 and latch it
    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            set_pin(pin, nibble & (1 << bit) != 0)?;
        }

        // Latch on the falling edge of E
        self.set_en(true)?;
        self.delay.delay_us(1);
        self.set_en(false)?;
        self.delay.delay_us(100);
        Ok(())
    }

    fn write_byte(&mut self, value: u8, is_data: bool) -> Result<(), DisplayError> {
        self.set_rs(is_data)?;
        self.write_nibble(value >> 4)?;
        self.write_nibble(value & 0x0F)
    }

    fn command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.write_byte(command, false)
    }
}

impl<P, D> CharDisplay for Hd44780<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::CLEAR_DISPLAY)?;
        // Clear is the slow command
        self.delay.delay_us(2000);
        Ok(())
    }

    fn write_at(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        let offset = *ROW_OFFSETS
            .get(row as usize)
            .ok_or(DisplayError::InvalidPosition)?;
        if col as usize >= LCD_COLS {
            return Err(DisplayError::InvalidPosition);
        }

        self.command(cmd::SET_DDRAM_ADDR | (offset + col))?;
        for c in text.chars() {
            let byte = if c.is_ascii() && !c.is_ascii_control() {
                c as u8
            } else {
                REPLACEMENT
            };
            self.write_byte(byte, true)?;
        }
        Ok(())
    }
}

fn set_pin<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), DisplayError> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| DisplayError::Communication)
}
