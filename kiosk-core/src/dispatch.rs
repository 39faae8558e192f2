//! Action dispatch
//!
//! Maps an action name and integer argument onto an [`Actuator`] operation,
//! the status screen shown while and after it runs, and the lines written to
//! the observability stream.

use core::fmt;

use crate::config::AngleLimits;
use crate::display::{line_fmt, Frame};
use crate::traits::Actuator;

/// Dispatch errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Name does not match any action
    UnknownCommand,
    /// Current display state does not take commands
    NotReady,
}

/// A resolved action with its argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Move to an angle
    GoTo(i32),
    /// Alternate between the extremes
    Spin(i32),
    /// Step through the full range and back
    Sweep(i32),
    /// Oscillate around center
    Nod(i32),
    /// Random jitter around center
    Shake(i32),
}

impl Action {
    /// Resolve a command name (case-insensitive)
    pub fn resolve(name: &str, argument: i32) -> Result<Self, DispatchError> {
        const ACTIONS: [(&str, fn(i32) -> Action); 5] = [
            ("goto", Action::GoTo),
            ("spin", Action::Spin),
            ("sweep", Action::Sweep),
            ("nod", Action::Nod),
            ("shake", Action::Shake),
        ];

        ACTIONS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, build)| build(argument))
            .ok_or(DispatchError::UnknownCommand)
    }

    /// Status screen for this action
    ///
    /// GoTo shows the angle it will actually reach.
    pub fn banner(&self, limits: &AngleLimits) -> Frame {
        let mut frame = Frame::new();
        match *self {
            Action::GoTo(angle) => {
                frame.set_line(0, "Moving to Angle");
                frame.set_line(1, &line_fmt(format_args!("{} deg", limits.clamp(angle))));
            }
            Action::Spin(times) => {
                frame.set_line(0, "Action: Spin");
                frame.set_line(1, &line_fmt(format_args!("Times: {}", times)));
            }
            Action::Sweep(reps) => {
                frame.set_line(0, "Action: Sweep");
                frame.set_line(1, &line_fmt(format_args!("Reps: {}", reps)));
            }
            Action::Nod(times) => {
                frame.set_line(0, "Action: Nod");
                frame.set_line(1, &line_fmt(format_args!("Times: {}", times)));
            }
            Action::Shake(times) => {
                frame.set_line(0, "Action: Shake");
                frame.set_line(1, &line_fmt(format_args!("Times: {}", times)));
            }
        }
        frame
    }

    /// Run the action to completion, logging start and finish
    ///
    /// Blocks for the whole motion sequence.
    pub fn run<A, L>(self, actuator: &mut A, log: &mut L)
    where
        A: Actuator,
        L: fmt::Write,
    {
        // The observability stream is best-effort
        match self {
            Action::GoTo(angle) => {
                let committed = actuator.go_to(angle);
                let _ = writeln!(log, "Motor moved to: {}", committed);
            }
            Action::Spin(times) => {
                let _ = writeln!(log, "Executing spin sequence...");
                actuator.spin(times);
                let _ = writeln!(log, "Spin sequence complete.");
            }
            Action::Sweep(reps) => {
                let _ = writeln!(log, "Executing sweep sequence...");
                actuator.sweep(reps);
                let _ = writeln!(log, "Sweep sequence complete.");
            }
            Action::Nod(times) => {
                let _ = writeln!(log, "Executing nod sequence...");
                actuator.nod(times);
                let _ = writeln!(log, "Nod sequence complete.");
            }
            Action::Shake(times) => {
                let _ = writeln!(log, "Executing chaotic shake sequence...");
                actuator.shake(times);
                let _ = writeln!(log, "Shake sequence complete.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    #[derive(Default)]
    struct RecordingActuator {
        angle: i32,
        calls: heapless::Vec<(&'static str, i32), 8>,
    }

    impl Actuator for RecordingActuator {
        fn current_angle(&self) -> i32 {
            self.angle
        }
        fn go_to(&mut self, angle: i32) -> i32 {
            self.angle = angle.clamp(0, 180);
            let _ = self.calls.push(("goto", angle));
            self.angle
        }
        fn spin(&mut self, times: i32) {
            let _ = self.calls.push(("spin", times));
        }
        fn sweep(&mut self, repetitions: i32) {
            let _ = self.calls.push(("sweep", repetitions));
        }
        fn nod(&mut self, times: i32) {
            let _ = self.calls.push(("nod", times));
        }
        fn shake(&mut self, times: i32) {
            let _ = self.calls.push(("shake", times));
        }
        fn shake_silent(&mut self, times: i32) {
            let _ = self.calls.push(("shake_silent", times));
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(Action::resolve("goto", 45), Ok(Action::GoTo(45)));
        assert_eq!(Action::resolve("SPIN", 2), Ok(Action::Spin(2)));
        assert_eq!(Action::resolve("Sweep", 1), Ok(Action::Sweep(1)));
        assert_eq!(Action::resolve("nOd", 3), Ok(Action::Nod(3)));
        assert_eq!(Action::resolve("shake", 0), Ok(Action::Shake(0)));
    }

    #[test]
    fn test_resolve_unknown() {
        assert_eq!(
            Action::resolve("dance", 1),
            Err(DispatchError::UnknownCommand)
        );
        assert_eq!(Action::resolve("", 1), Err(DispatchError::UnknownCommand));
        // Silent shake is internal feedback, not a host command
        assert_eq!(
            Action::resolve("shake_silent", 1),
            Err(DispatchError::UnknownCommand)
        );
    }

    #[test]
    fn test_banners() {
        let limits = AngleLimits::default();

        let frame = Action::GoTo(999).banner(&limits);
        assert_eq!(frame.line(0), "Moving to Angle");
        assert_eq!(frame.line(1), "180 deg");

        let frame = Action::Sweep(2).banner(&limits);
        assert_eq!(frame.line(0), "Action: Sweep");
        assert_eq!(frame.line(1), "Reps: 2");

        let frame = Action::Shake(-1).banner(&limits);
        assert_eq!(frame.line(0), "Action: Shake");
        assert_eq!(frame.line(1), "Times: -1");
    }

    #[test]
    fn test_run_logs_start_and_finish() {
        let mut actuator = RecordingActuator::default();
        let mut log: String<128> = String::new();

        Action::Nod(2).run(&mut actuator, &mut log);
        assert_eq!(actuator.calls.as_slice(), &[("nod", 2)]);
        assert_eq!(
            log.as_str(),
            "Executing nod sequence...\nNod sequence complete.\n"
        );
    }

    #[test]
    fn test_run_goto_logs_committed_angle() {
        let mut actuator = RecordingActuator::default();
        let mut log: String<64> = String::new();

        Action::GoTo(-10).run(&mut actuator, &mut log);
        assert_eq!(actuator.angle, 0);
        assert_eq!(log.as_str(), "Motor moved to: 0\n");
    }
}
