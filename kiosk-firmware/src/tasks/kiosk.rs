//! Kiosk task
//!
//! Owns the display, servo and card reader and drives the kiosk from a
//! fixed-rate ticker. Physical actions block this task while they run;
//! the serial tasks keep buffering in the meantime.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::pwm::Pwm;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_hal_bus::spi::ExclusiveDevice;
use mfrc522::comm::blocking::spi::SpiInterface;
use mfrc522::Mfrc522;
use rand::rngs::SmallRng;

use kiosk_core::config::KioskConfig;
use kiosk_core::Kiosk;
use kiosk_drivers::lcd::Hd44780;
use kiosk_drivers::servo::{PwmServo, ServoActuator};

use crate::channels::COMMAND_CHANNEL;
use crate::console::Console;
use crate::reader::Mfrc522Reader;

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 10;

/// 16x2 LCD on six GPIO outputs
pub type Lcd = Hd44780<Output<'static>, Delay>;

/// Servo with blocking motion sequences
pub type Servo = ServoActuator<PwmServo<Pwm<'static>>, Delay, SmallRng>;

/// MFRC522 chip-select device on SPI1
pub type RfidSpi = ExclusiveDevice<Spi<'static, SPI1, Blocking>, Output<'static>, Delay>;

/// The kiosk as wired on this board
pub type FirmwareKiosk<R> = Kiosk<Lcd, Servo, R, Console>;

/// Kiosk task - ticks the controller and feeds it host commands
#[embassy_executor::task]
pub async fn kiosk_task(
    config: KioskConfig,
    lcd: Lcd,
    servo: Servo,
    rfid: RfidSpi,
    mut backlight: Output<'static>,
) {
    info!("Kiosk task started");

    // Without a reader the kiosk stays at the card prompt
    let reader = match Mfrc522::new(SpiInterface::new(rfid)).init() {
        Ok(mut mfrc) => {
            match mfrc.version() {
                Ok(version) => info!("MFRC522 version: 0x{:02x}", version),
                Err(e) => warn!("MFRC522 version read failed: {:?}", Debug2Format(&e)),
            }
            Some(Mfrc522Reader::new(mfrc))
        }
        Err(e) => {
            error!("MFRC522 init failed: {:?}", Debug2Format(&e));
            None
        }
    };

    let start = Instant::now();
    let now_ms = || start.elapsed().as_millis() as u32;

    let mut kiosk: FirmwareKiosk<_> = Kiosk::new(config, lcd, servo, reader, Console::new());
    kiosk.boot(now_ms());
    info!("Kiosk booted in {:?}", kiosk.state());

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        ticker.next().await;

        let command = COMMAND_CHANNEL.try_receive().ok();
        let before = kiosk.state();
        if let Some(event) = kiosk.tick(now_ms(), command) {
            info!("{:?}: {:?} -> {:?}", event, before, kiosk.state());
        }

        if kiosk.is_halted() {
            break;
        }
    }

    backlight.set_low();
    info!("Kiosk halted; power cycle to restart");

    // Keep the host from filling the channel against a stopped kiosk
    loop {
        let command = COMMAND_CHANNEL.receive().await;
        debug!("Ignoring command while halted: {:?}", command);
    }
}
