//! ServoBot - RFID-gated servo kiosk firmware
//!
//! Main firmware binary for RP2040-based boards. A host on the serial link
//! sends one command per line; the kiosk answers on a 16x2 LCD and with a
//! hobby servo, once an allowed RFID card has been presented.
//!
//! Wiring:
//! - UART0: TX GPIO0, RX GPIO1 (115200 baud, host link)
//! - Servo: GPIO2 (PWM slice 1, channel A)
//! - LCD: RS GPIO6, E GPIO7, D4-D7 GPIO8-11, backlight GPIO16
//! - MFRC522 on SPI1: SCK GPIO14, MOSI GPIO15, MISO GPIO12, SDA GPIO13, RST GPIO17

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use kiosk_drivers::lcd::Hd44780;
use kiosk_drivers::servo::{PwmServo, PwmServoConfig, ServoActuator};

mod channels;
mod config;
mod console;
mod reader;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Servo PWM: 125 MHz / 125 = 1 MHz, so one count per microsecond
const SERVO_PWM_DIVIDER: u8 = 125;

/// Servo PWM period of 20 ms in 1 µs counts
const SERVO_PWM_TOP: u16 = 19_999;

/// MFRC522 SPI clock
const RFID_SPI_HZ: u32 = 1_000_000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ServoBot firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    info!(
        "Servo range {}..{}, initial {}",
        config.servo.min,
        config.servo.max,
        config.servo.initial
    );

    // Setup UART for the host link
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for host communication");

    // Setup servo PWM
    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = SERVO_PWM_DIVIDER.into();
    pwm_config.top = SERVO_PWM_TOP;
    let pwm = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_2, pwm_config);

    // Ring oscillator jitter gives a different shake pattern each boot
    let rng = SmallRng::seed_from_u64(RoscRng.next_u64());
    let mut servo = ServoActuator::new(
        PwmServo::new(pwm, PwmServoConfig::default()),
        Delay,
        rng,
        config.servo,
    );
    servo.home();

    info!("Servo initialized");

    // Setup LCD (4-bit parallel)
    let mut lcd = Hd44780::new(
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        [
            Output::new(p.PIN_8, Level::Low),
            Output::new(p.PIN_9, Level::Low),
            Output::new(p.PIN_10, Level::Low),
            Output::new(p.PIN_11, Level::Low),
        ],
        Delay,
    );
    if let Err(e) = lcd.init() {
        error!("LCD init failed: {:?}", e);
    }
    let backlight = Output::new(p.PIN_16, Level::High);

    info!("LCD initialized");

    // Setup MFRC522 on SPI1; pulse reset before the first transfer
    let mut rfid_reset = Output::new(p.PIN_17, Level::Low);
    Timer::after_millis(10).await;
    rfid_reset.set_high();
    // The reset line must stay driven high
    core::mem::forget(rfid_reset);

    let mut spi_config = SpiConfig::default();
    spi_config.frequency = RFID_SPI_HZ;
    let spi = Spi::new_blocking(p.SPI1, p.PIN_14, p.PIN_15, p.PIN_12, spi_config);
    let rfid_cs = Output::new(p.PIN_13, Level::High);
    let rfid = ExclusiveDevice::new(spi, rfid_cs, Delay).unwrap();

    info!("SPI initialized for card reader");

    // Spawn tasks
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner
        .spawn(tasks::kiosk_task(config, lcd, servo, rfid, backlight))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
