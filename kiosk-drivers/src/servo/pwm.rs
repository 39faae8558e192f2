//! Hobby servo on a PWM channel
//!
//! Standard hobby servos read the width of a pulse repeated every 20 ms.
//! The angle maps linearly onto the pulse width between `min_pulse_us` (0°)
//! and `max_pulse_us` (180°).

use embedded_hal::pwm::SetDutyCycle;

use kiosk_core::traits::ServoOutput;

/// Pulse timing for a hobby servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmServoConfig {
    /// Pulse width at 0 degrees (µs)
    pub min_pulse_us: u16,
    /// Pulse width at 180 degrees (µs)
    pub max_pulse_us: u16,
    /// PWM period (µs)
    pub period_us: u16,
}

impl Default for PwmServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 544,
            max_pulse_us: 2400,
            period_us: 20_000,
        }
    }
}

impl PwmServoConfig {
    /// Pulse width for an angle; angles past 180 are treated as 180
    pub fn pulse_us(&self, degrees: u8) -> u16 {
        let degrees = degrees.min(180) as u32;
        let span = self.max_pulse_us.saturating_sub(self.min_pulse_us) as u32;
        self.min_pulse_us + (span * degrees / 180) as u16
    }
}

/// Servo driven by a PWM channel configured for the servo period
pub struct PwmServo<P> {
    pwm: P,
    config: PwmServoConfig,
    /// Last pulse width written (µs)
    pulse_us: Option<u16>,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Create a servo on a PWM channel
    ///
    /// The channel must already run at the configured period.
    pub fn new(pwm: P, config: PwmServoConfig) -> Self {
        Self {
            pwm,
            config,
            pulse_us: None,
        }
    }

    /// Last pulse width written (µs)
    pub fn pulse_us(&self) -> Option<u16> {
        self.pulse_us
    }

    /// Stop sending pulses; the servo goes limp
    pub fn detach(&mut self) -> Result<(), P::Error> {
        self.pulse_us = None;
        self.pwm.set_duty_cycle_fully_off()
    }
}

impl<P: SetDutyCycle> ServoOutput for PwmServo<P> {
    fn write_angle(&mut self, degrees: u8) {
        let pulse = self.config.pulse_us(degrees);
        // A rejected duty cycle leaves the previous pulse running
        if self
            .pwm
            .set_duty_cycle_fraction(pulse, self.config.period_us)
            .is_ok()
        {
            self.pulse_us = Some(pulse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// PWM channel whose duty counts match microseconds of a 20 ms period
    struct MockPwm {
        duty: u16,
    }

    impl embedded_hal::pwm::ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            20_000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn test_pulse_width_mapping() {
        let config = PwmServoConfig::default();
        assert_eq!(config.pulse_us(0), 544);
        assert_eq!(config.pulse_us(90), 1472);
        assert_eq!(config.pulse_us(180), 2400);
        assert_eq!(config.pulse_us(255), 2400);
    }

    #[test]
    fn test_write_angle_sets_duty() {
        let mut servo = PwmServo::new(MockPwm { duty: 0 }, PwmServoConfig::default());
        assert_eq!(servo.pulse_us(), None);

        servo.write_angle(45);
        assert_eq!(servo.pulse_us(), Some(1008));
        assert_eq!(servo.pwm.duty, 1008);

        servo.detach().unwrap();
        assert_eq!(servo.pwm.duty, 0);
        assert_eq!(servo.pulse_us(), None);
    }
}
