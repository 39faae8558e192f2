//! Elapsed-time primitives shared by every display state
//!
//! Timestamps are milliseconds from a free-running `u32` counter that wraps
//! after roughly 49.7 days. Every comparison goes through [`elapsed`], so a
//! phase that straddles the wrap still expires on time.
//!
//! Two shapes cover all states:
//! - [`Phase`]: a one-shot display window (auth failure, action status,
//!   card scanned, shutdown)
//! - [`Periodic`]: a repeating interval (welcome pages, thinking animation)

/// Milliseconds from `start` to `now`, correct across counter wraparound
#[inline]
pub const fn elapsed(now: u32, start: u32) -> u32 {
    now.wrapping_sub(start)
}

/// A fixed-duration display window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Phase {
    duration_ms: u32,
    /// `None` until the phase is armed
    start_ms: Option<u32>,
}

impl Phase {
    /// A phase armed at `now`
    pub const fn started(duration_ms: u32, now: u32) -> Self {
        Self {
            duration_ms,
            start_ms: Some(now),
        }
    }

    /// A phase armed by the first [`Phase::expired`] call
    ///
    /// Used when entering the state ran a blocking action: the window then
    /// starts once the action has returned.
    pub const fn deferred(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            start_ms: None,
        }
    }

    /// Check whether the window has run out
    ///
    /// An unarmed phase is armed at `now` and only reports expiry if its
    /// duration is zero.
    pub fn expired(&mut self, now: u32) -> bool {
        match self.start_ms {
            Some(start) => elapsed(now, start) >= self.duration_ms,
            None => {
                self.start_ms = Some(now);
                self.duration_ms == 0
            }
        }
    }

    /// Duration of the window
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Arming timestamp, if armed
    pub fn start_ms(&self) -> Option<u32> {
        self.start_ms
    }
}

/// A repeating interval timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Periodic {
    interval_ms: u32,
    last_ms: u32,
}

impl Periodic {
    /// Create a timer whose first period starts at `now`
    pub const fn new(interval_ms: u32, now: u32) -> Self {
        Self {
            interval_ms,
            last_ms: now,
        }
    }

    /// Check whether an interval has passed since the last fire
    ///
    /// Fires at most once per call and re-arms at `now`.
    pub fn due(&mut self, now: u32) -> bool {
        if elapsed(now, self.last_ms) >= self.interval_ms {
            self.last_ms = now;
            true
        } else {
            false
        }
    }

    /// Interval length
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_phase_expires_at_duration() {
        let mut phase = Phase::started(3000, 1000);
        assert!(!phase.expired(1000));
        assert!(!phase.expired(3999));
        assert!(phase.expired(4000));
        assert!(phase.expired(9000));
    }

    #[test]
    fn test_deferred_phase_arms_on_first_check() {
        let mut phase = Phase::deferred(3000);
        assert_eq!(phase.start_ms(), None);

        // The blocking action returned at t=5000
        assert!(!phase.expired(5000));
        assert_eq!(phase.start_ms(), Some(5000));
        assert!(!phase.expired(7999));
        assert!(phase.expired(8000));
    }

    #[test]
    fn test_zero_duration_deferred_phase() {
        let mut phase = Phase::deferred(0);
        assert!(phase.expired(42));
    }

    #[test]
    fn test_elapsed_across_wraparound() {
        let start = u32::MAX - 99;
        let now = 50;
        assert_eq!(elapsed(now, start), 150);

        let mut phase = Phase::started(200, start);
        assert!(!phase.expired(now));
        assert!(phase.expired(100));
    }

    #[test]
    fn test_periodic_fires_once_per_interval() {
        let mut timer = Periodic::new(350, 0);
        assert!(!timer.due(349));
        assert!(timer.due(350));
        assert!(!timer.due(350));
        assert!(!timer.due(699));
        assert!(timer.due(700));
    }

    #[test]
    fn test_periodic_late_tick_fires_once() {
        let mut timer = Periodic::new(100, 0);
        // Tick arrives three intervals late: still a single fire
        assert!(timer.due(300));
        assert!(!timer.due(350));
        assert!(timer.due(400));
    }

    proptest! {
        #[test]
        fn prop_elapsed_matches_offset(start in any::<u32>(), offset in 0u32..1_000_000) {
            let now = start.wrapping_add(offset);
            prop_assert_eq!(elapsed(now, start), offset);
        }

        #[test]
        fn prop_phase_never_expires_early(start in any::<u32>(), duration in 1u32..100_000, offset in 0u32..200_000) {
            let mut phase = Phase::started(duration, start);
            let now = start.wrapping_add(offset);
            prop_assert_eq!(phase.expired(now), offset >= duration);
        }
    }
}
