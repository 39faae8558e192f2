//! Servo motion sequences
//!
//! [`ServoActuator`] implements the kiosk's [`Actuator`] on top of a raw
//! [`ServoOutput`]. Every motion is paced with a blocking [`DelayNs`], so
//! each call returns only once the whole sequence has been commanded.
//!
//! Current angle bookkeeping:
//! - `go_to` commits the clamped target
//! - `spin` and `sweep` finish back at the angle they started from
//! - `nod` and `shake` finish at center
//! - `shake_silent` moves like `shake` but leaves the recorded angle alone
//!
//! # Usage
//!
//! ```ignore
//! let mut servo = ServoActuator::new(pwm_servo, Delay, rng, config.servo);
//! servo.home();
//! servo.go_to(45);
//! servo.nod(2);
//! ```

use embedded_hal::delay::DelayNs;
use rand::Rng;

use kiosk_core::config::AngleLimits;
use kiosk_core::traits::{Actuator, ServoOutput};

/// Pauses and amplitudes for the motion sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionTiming {
    /// Pause at each extreme while spinning (ms)
    pub spin_pause_ms: u32,
    /// Degrees per sweep step
    pub sweep_step_deg: usize,
    /// Pause per sweep step (ms)
    pub sweep_step_ms: u32,
    /// Nod amplitude either side of center (degrees)
    pub nod_range_deg: i32,
    /// Pause at center before nodding (ms)
    pub nod_settle_ms: u32,
    /// Pause at each nod extreme (ms)
    pub nod_pause_ms: u32,
    /// Shake amplitude either side of center (degrees)
    pub shake_range_deg: i32,
    /// Pause at center before shaking (ms)
    pub shake_settle_ms: u32,
    /// Random moves per requested shake
    pub shake_moves_per_time: i32,
    /// Shortest pause between shake moves (ms)
    pub shake_min_pause_ms: u32,
    /// Pause bound between shake moves, exclusive (ms)
    pub shake_max_pause_ms: u32,
}

impl Default for MotionTiming {
    fn default() -> Self {
        Self {
            spin_pause_ms: 400,
            sweep_step_deg: 2,
            sweep_step_ms: 15,
            nod_range_deg: 30,
            nod_settle_ms: 200,
            nod_pause_ms: 300,
            shake_range_deg: 45,
            shake_settle_ms: 200,
            shake_moves_per_time: 6,
            shake_min_pause_ms: 70,
            shake_max_pause_ms: 150,
        }
    }
}

/// Blocking servo actuator
pub struct ServoActuator<S, D, R> {
    servo: S,
    delay: D,
    rng: R,
    limits: AngleLimits,
    timing: MotionTiming,
    /// Last angle believed commanded
    current: i32,
}

impl<S, D, R> ServoActuator<S, D, R>
where
    S: ServoOutput,
    D: DelayNs,
    R: Rng,
{
    /// Create an actuator with the stock motion timing
    ///
    /// The servo is not driven until [`ServoActuator::home`] or a motion.
    pub fn new(servo: S, delay: D, rng: R, limits: AngleLimits) -> Self {
        Self::with_timing(servo, delay, rng, limits, MotionTiming::default())
    }

    /// Create an actuator with custom motion timing
    ///
    /// A shake pause window that is empty is widened to one millisecond and
    /// a negative shake amplitude is treated as zero.
    pub fn with_timing(
        servo: S,
        delay: D,
        rng: R,
        limits: AngleLimits,
        mut timing: MotionTiming,
    ) -> Self {
        if timing.shake_max_pause_ms <= timing.shake_min_pause_ms {
            timing.shake_max_pause_ms = timing.shake_min_pause_ms.saturating_add(1);
            timing.shake_min_pause_ms = timing.shake_max_pause_ms - 1;
        }
        timing.shake_range_deg = timing.shake_range_deg.max(0);

        let current = limits.clamp(limits.initial);
        Self {
            servo,
            delay,
            rng,
            limits,
            timing,
            current,
        }
    }

    /// Drive the servo to the initial angle
    pub fn home(&mut self) {
        self.write(self.current);
    }

    /// Travel limits
    pub fn limits(&self) -> &AngleLimits {
        &self.limits
    }

    /// Release the parts
    pub fn release(self) -> (S, D, R) {
        (self.servo, self.delay, self.rng)
    }

    /// Command an angle, clamped to the travel limits
    fn write(&mut self, angle: i32) {
        let angle = self.limits.clamp(angle).clamp(0, 180);
        self.servo.write_angle(angle as u8);
    }

    /// Shake motion shared by `shake` and `shake_silent`
    fn shake_motion(&mut self, times: i32) {
        let center = self.limits.center();
        let range = self.timing.shake_range_deg;

        self.write(center);
        self.delay.delay_ms(self.timing.shake_settle_ms);

        let moves = times.max(0).saturating_mul(self.timing.shake_moves_per_time);
        for _ in 0..moves {
            let angle = self.rng.gen_range(center - range..=center + range);
            self.write(angle);
            let pause = self
                .rng
                .gen_range(self.timing.shake_min_pause_ms..self.timing.shake_max_pause_ms);
            self.delay.delay_ms(pause);
        }

        self.write(center);
    }
}

impl<S, D, R> Actuator for ServoActuator<S, D, R>
where
    S: ServoOutput,
    D: DelayNs,
    R: Rng,
{
    fn current_angle(&self) -> i32 {
        self.current
    }

    fn go_to(&mut self, angle: i32) -> i32 {
        let angle = self.limits.clamp(angle);
        self.write(angle);
        self.current = angle;
        angle
    }

    fn spin(&mut self, times: i32) {
        let AngleLimits { min, max, .. } = self.limits;
        for _ in 0..times.max(0) {
            self.write(min);
            self.delay.delay_ms(self.timing.spin_pause_ms);
            self.write(max);
            self.delay.delay_ms(self.timing.spin_pause_ms);
        }
        self.write(self.current);
    }

    fn sweep(&mut self, repetitions: i32) {
        let AngleLimits { min, max, .. } = self.limits;
        let step = self.timing.sweep_step_deg.max(1);
        for _ in 0..repetitions.max(0) {
            for angle in (min..=max).step_by(step) {
                self.write(angle);
                self.delay.delay_ms(self.timing.sweep_step_ms);
            }
            for angle in (min..=max).rev().step_by(step) {
                self.write(angle);
                self.delay.delay_ms(self.timing.sweep_step_ms);
            }
        }
        self.write(self.current);
    }

    fn nod(&mut self, times: i32) {
        let center = self.limits.center();
        let range = self.timing.nod_range_deg;

        self.write(center);
        self.delay.delay_ms(self.timing.nod_settle_ms);
        for _ in 0..times.max(0) {
            self.write(center - range);
            self.delay.delay_ms(self.timing.nod_pause_ms);
            self.write(center + range);
            self.delay.delay_ms(self.timing.nod_pause_ms);
        }
        self.write(center);
        self.current = center;
    }

    fn shake(&mut self, times: i32) {
        self.shake_motion(times);
        self.current = self.limits.center();
    }

    fn shake_silent(&mut self, times: i32) {
        self.shake_motion(times);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Servo output that remembers every commanded angle
    #[derive(Default)]
    struct RecordingServo {
        writes: Vec<u8, 512>,
    }

    impl ServoOutput for RecordingServo {
        fn write_angle(&mut self, degrees: u8) {
            let _ = self.writes.push(degrees);
        }
    }

    /// Delay that adds up requested time instead of waiting
    #[derive(Default)]
    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ns += ms as u64 * 1_000_000;
        }
    }

    type TestActuator = ServoActuator<RecordingServo, CountingDelay, SmallRng>;

    fn make_actuator() -> TestActuator {
        ServoActuator::new(
            RecordingServo::default(),
            CountingDelay::default(),
            SmallRng::seed_from_u64(7),
            AngleLimits::default(),
        )
    }

    fn writes(actuator: &TestActuator) -> &[u8] {
        &actuator.servo.writes
    }

    fn total_ms(actuator: &TestActuator) -> u64 {
        actuator.delay.total_ns / 1_000_000
    }

    #[test]
    fn test_home_writes_initial_angle() {
        let mut actuator = make_actuator();
        assert!(writes(&actuator).is_empty());
        actuator.home();
        assert_eq!(writes(&actuator), &[90]);
        assert_eq!(actuator.current_angle(), 90);
    }

    #[test]
    fn test_go_to_clamps() {
        let mut actuator = make_actuator();
        assert_eq!(actuator.go_to(-10), 0);
        assert_eq!(actuator.go_to(999), 180);
        assert_eq!(actuator.go_to(45), 45);
        assert_eq!(writes(&actuator), &[0, 180, 45]);
        assert_eq!(actuator.current_angle(), 45);
        assert_eq!(total_ms(&actuator), 0);
    }

    #[test]
    fn test_go_to_respects_configured_limits() {
        let mut actuator = ServoActuator::new(
            RecordingServo::default(),
            CountingDelay::default(),
            SmallRng::seed_from_u64(1),
            AngleLimits {
                min: 20,
                max: 160,
                initial: 90,
            },
        );
        assert_eq!(actuator.go_to(0), 20);
        assert_eq!(actuator.go_to(170), 160);
    }

    #[test]
    fn test_spin_returns_to_start() {
        let mut actuator = make_actuator();
        actuator.go_to(45);
        actuator.spin(2);

        assert_eq!(writes(&actuator), &[45, 0, 180, 0, 180, 45]);
        assert_eq!(actuator.current_angle(), 45);
        assert_eq!(total_ms(&actuator), 4 * 400);
    }

    #[test]
    fn test_sweep_steps_through_range() {
        let mut actuator = make_actuator();
        actuator.sweep(1);

        let w = writes(&actuator);
        // 91 steps up, 91 steps down, then back to start
        assert_eq!(w.len(), 91 + 91 + 1);
        assert_eq!(w[0], 0);
        assert_eq!(w[1], 2);
        assert_eq!(w[90], 180);
        assert_eq!(w[91], 180);
        assert_eq!(w[181], 0);
        assert_eq!(w[182], 90);
        assert_eq!(actuator.current_angle(), 90);
        assert_eq!(total_ms(&actuator), 182 * 15);
    }

    #[test]
    fn test_nod_ends_at_center() {
        let mut actuator = make_actuator();
        actuator.go_to(10);
        actuator.nod(2);

        assert_eq!(writes(&actuator), &[10, 90, 60, 120, 60, 120, 90]);
        assert_eq!(actuator.current_angle(), 90);
        assert_eq!(total_ms(&actuator), 200 + 4 * 300);
    }

    #[test]
    fn test_shake_stays_in_range() {
        let mut actuator = make_actuator();
        actuator.go_to(170);
        actuator.shake(2);

        let w = writes(&actuator);
        // goto, center, 12 random moves, center
        assert_eq!(w.len(), 1 + 1 + 12 + 1);
        assert_eq!(w[1], 90);
        assert!(w[2..14].iter().all(|&a| (45..=135).contains(&a)));
        assert_eq!(w[14], 90);
        assert_eq!(actuator.current_angle(), 90);

        let ms = total_ms(&actuator);
        assert!(ms >= 200 + 12 * 70);
        assert!(ms < 200 + 12 * 150);
    }

    #[test]
    fn test_shake_silent_keeps_angle() {
        let mut actuator = make_actuator();
        actuator.go_to(30);
        actuator.shake_silent(1);

        assert_eq!(writes(&actuator).len(), 1 + 1 + 6 + 1);
        assert_eq!(actuator.current_angle(), 30);
    }

    #[test]
    fn test_non_positive_counts_only_frame() {
        let mut actuator = make_actuator();
        actuator.spin(0);
        actuator.sweep(-1);
        actuator.nod(-5);
        actuator.shake(0);

        // spin/sweep: return write only; nod: center, center; shake: center, center
        assert_eq!(writes(&actuator), &[90, 90, 90, 90, 90, 90]);
        assert_eq!(total_ms(&actuator), 200 + 200);
    }

    #[test]
    fn test_shake_with_fixed_pause() {
        let timing = MotionTiming {
            shake_min_pause_ms: 100,
            shake_max_pause_ms: 100,
            shake_range_deg: -10,
            ..MotionTiming::default()
        };
        let mut actuator = ServoActuator::with_timing(
            RecordingServo::default(),
            CountingDelay::default(),
            SmallRng::seed_from_u64(3),
            AngleLimits::default(),
            timing,
        );
        actuator.shake(1);

        // Zero amplitude keeps every move at center
        assert!(writes(&actuator).iter().all(|&a| a == 90));
        assert_eq!(total_ms(&actuator), 200 + 6 * 100);

        let mut actuator = ServoActuator::with_timing(
            RecordingServo::default(),
            CountingDelay::default(),
            SmallRng::seed_from_u64(3),
            AngleLimits::default(),
            MotionTiming {
                shake_min_pause_ms: u32::MAX,
                shake_max_pause_ms: 0,
                shake_moves_per_time: 1,
                ..MotionTiming::default()
            },
        );
        actuator.shake_silent(1);
        assert_eq!(writes(&actuator).len(), 3);
    }

    #[test]
    fn test_shake_is_reproducible_for_a_seed() {
        let mut a = make_actuator();
        let mut b = make_actuator();
        a.shake(3);
        b.shake(3);
        assert_eq!(writes(&a), writes(&b));
    }

    proptest! {
        #[test]
        fn prop_go_to_commits_in_range(angle in any::<i32>()) {
            let mut actuator = make_actuator();
            let committed = actuator.go_to(angle);
            prop_assert!((0..=180).contains(&committed));
            prop_assert_eq!(actuator.current_angle(), committed);
        }

        #[test]
        fn prop_spin_and_sweep_restore_angle(start in 0i32..=180, times in -3i32..4) {
            let mut actuator = make_actuator();
            actuator.go_to(start);
            actuator.spin(times);
            prop_assert_eq!(actuator.current_angle(), start);
            prop_assert_eq!(writes(&actuator).last().copied(), Some(start as u8));

            actuator.sweep(times.min(1));
            prop_assert_eq!(actuator.current_angle(), start);
            prop_assert_eq!(writes(&actuator).last().copied(), Some(start as u8));
        }
    }
}
