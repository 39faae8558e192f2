//! Actuator traits
//!
//! Two layers:
//! - [`ServoOutput`]: raw "hold this angle" output to the servo hardware
//! - [`Actuator`]: the motion vocabulary the kiosk dispatches to
//!
//! Every [`Actuator`] operation is synchronous and occupies the caller for the
//! whole motion sequence. Keeping this behind a trait lets a cancellable or
//! async implementation replace the blocking one without touching the
//! controller.

/// Trait for the servo output stage
pub trait ServoOutput {
    /// Command the servo to hold an angle in degrees (0-180)
    fn write_angle(&mut self, degrees: u8);
}

impl<T: ServoOutput + ?Sized> ServoOutput for &mut T {
    fn write_angle(&mut self, degrees: u8) {
        (**self).write_angle(degrees)
    }
}

/// Trait for the kiosk's motion operations
///
/// Repetition counts are taken as-is; zero or negative counts perform no
/// repetitions.
pub trait Actuator {
    /// Last angle believed to be commanded
    fn current_angle(&self) -> i32;

    /// Move to an angle, clamped to the configured range
    ///
    /// Returns the committed angle.
    fn go_to(&mut self, angle: i32) -> i32;

    /// Alternate between the range extremes, then return to the starting angle
    fn spin(&mut self, times: i32);

    /// Step through the full range and back, then return to the starting angle
    fn sweep(&mut self, repetitions: i32);

    /// Oscillate around center and finish there
    fn nod(&mut self, times: i32);

    /// Random jitter around center and finish there
    fn shake(&mut self, times: i32);

    /// Same motion as [`Actuator::shake`] without updating the current angle
    fn shake_silent(&mut self, times: i32);
}

impl<T: Actuator + ?Sized> Actuator for &mut T {
    fn current_angle(&self) -> i32 {
        (**self).current_angle()
    }

    fn go_to(&mut self, angle: i32) -> i32 {
        (**self).go_to(angle)
    }

    fn spin(&mut self, times: i32) {
        (**self).spin(times)
    }

    fn sweep(&mut self, repetitions: i32) {
        (**self).sweep(repetitions)
    }

    fn nod(&mut self, times: i32) {
        (**self).nod(times)
    }

    fn shake(&mut self, times: i32) {
        (**self).shake(times)
    }

    fn shake_silent(&mut self, times: i32) {
        (**self).shake_silent(times)
    }
}
