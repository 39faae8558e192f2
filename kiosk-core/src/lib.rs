//! Board-agnostic core logic for the servo kiosk firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (display, actuator, card reader)
//! - Display state machine and the cooperative controller that drives it
//! - Command decoding and dispatch to actuator operations
//! - Elapsed-time primitives (wraparound-safe)
//! - Configuration type definitions and the `kiosk.toml` parser

#![no_std]
#![deny(unsafe_code)]

pub mod card;
pub mod command;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod display;
pub mod state;
pub mod timer;
pub mod traits;

pub use controller::Kiosk;
