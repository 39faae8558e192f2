//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in kiosk-core for the kiosk's hardware:
//!
//! - Servo motion sequences over any angle output (blocking, delay-timed)
//! - Hobby servo PWM output
//! - HD44780 character LCD in 4-bit mode

#![no_std]
#![deny(unsafe_code)]

pub mod lcd;
pub mod servo;
