//! Servo drivers
//!
//! - [`ServoActuator`]: the kiosk's motion vocabulary on top of any
//!   [`ServoOutput`](kiosk_core::traits::ServoOutput)
//! - [`PwmServo`]: angle to pulse width on a PWM channel

pub mod actuator;
pub mod pwm;

pub use actuator::{MotionTiming, ServoActuator};
pub use pwm::{PwmServo, PwmServoConfig};
