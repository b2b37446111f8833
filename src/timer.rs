//! Deadline timers polled from the tick loop.
//!
//! Timers never run callbacks themselves. Owners poll them with the current
//! time and act on the firings they report, which keeps every timer on the
//! same single-threaded tick and makes firing order explicit at the call site.

/// A one-shot timer that fires once when its deadline passes.
#[derive(Clone, Copy, Debug)]
pub struct Delay {
    due: f32,
    fired: bool,
}

impl Delay {
    /// Schedule a firing `delay` seconds after `now`.
    pub fn after(now: f32, delay: f32) -> Self {
        Self {
            due: now + delay.max(0.0),
            fired: false,
        }
    }

    /// Returns `true` exactly once: on the first poll at or after the deadline.
    pub fn poll(&mut self, now: f32) -> bool {
        if !self.fired && now >= self.due {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn is_pending(&self) -> bool {
        !self.fired
    }

    pub fn due(&self) -> f32 {
        self.due
    }
}

/// A periodic timer.
///
/// If several periods elapse between polls, every missed firing is reported,
/// so a long frame never skips a step of whatever the interval drives.
#[derive(Clone, Copy, Debug)]
pub struct Interval {
    period: f32,
    next_due: f32,
}

impl Interval {
    /// Shortest period an interval runs at, in seconds.
    pub const MIN_PERIOD: f32 = 1e-3;

    /// First firing one full period after `now`. Shorter periods, zero and
    /// NaN run at [`Self::MIN_PERIOD`].
    pub fn starting_at(now: f32, period: f32) -> Self {
        let period = if period >= Self::MIN_PERIOD {
            period
        } else {
            Self::MIN_PERIOD
        };
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Number of firings due at `now`, advancing the schedule past them.
    pub fn poll(&mut self, now: f32) -> u32 {
        if now.is_nan() || now < self.next_due {
            return 0;
        }
        let fired = ((now - self.next_due) / self.period).floor() as u32 + 1;
        self.next_due += fired as f32 * self.period;
        fired
    }

    pub fn period(&self) -> f32 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_fires_once() {
        let mut delay = Delay::after(1.0, 0.5);
        assert!(!delay.poll(1.4));
        assert!(delay.poll(1.5));
        assert!(!delay.poll(2.0));
        assert!(!delay.is_pending());
    }

    #[test]
    fn interval_reports_missed_firings() {
        let mut interval = Interval::starting_at(0.0, 0.1);
        assert_eq!(interval.poll(0.05), 0);
        assert_eq!(interval.poll(0.1), 1);
        // Quarter-second stall covers the 0.2 and 0.3 deadlines.
        assert_eq!(interval.poll(0.35), 2);
        assert_eq!(interval.poll(0.35), 0);
    }

    #[test]
    fn zero_period_is_clamped_and_returns() {
        let mut interval = Interval::starting_at(7.0, 0.0);
        assert_eq!(interval.period(), Interval::MIN_PERIOD);
        assert_eq!(interval.poll(7.0), 0);
        // Deadlines at 7.001 ..= 7.010.
        assert_eq!(interval.poll(7.0105), 10);
        assert_eq!(interval.poll(7.0105), 0);
    }

    #[test]
    fn long_stall_is_counted_without_drift() {
        let mut interval = Interval::starting_at(100.0, 0.05);
        assert_eq!(interval.poll(110.025), 200);
        assert_eq!(interval.poll(110.04), 0);
        assert_eq!(interval.poll(110.06), 1);
    }
}
