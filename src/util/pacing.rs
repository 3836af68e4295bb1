//! Drift-free pacing for fixed-rate background loops.

use std::time::Duration;

use web_time::Instant;

/// Drift-free step pacing for background loops.
///
/// Each call to [`advance`](Self::advance) pushes a monotonically increasing
/// target time forward by one interval; the caller sleeps only the remaining
/// delta, so sleep-call overhead never accumulates across steps.
#[derive(Debug, Clone)]
pub struct Pacer {
    /// Next wall-clock deadline.
    target: Instant,
    /// Steps issued since the pacer was created or reset.
    steps: u64,
}

impl Pacer {
    /// Pacer whose first deadline is `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            target: now,
            steps: 0,
        }
    }

    /// Move the target forward by `interval` and return the new target.
    pub fn advance(&mut self, interval: Duration) -> Instant {
        self.target += interval;
        self.steps += 1;
        self.target
    }

    /// Time left until the current target (zero if already past it).
    pub fn remaining(&self, now: Instant) -> Duration {
        self.target.saturating_duration_since(now)
    }

    /// Restart pacing from `now`, e.g. after a pause.
    pub fn reset(&mut self, now: Instant) {
        self.target = now;
    }

    /// Number of intervals issued.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

/// Interval between steps for a rate in steps per second (rate >= 0.001).
pub fn interval_for_rate(steps_per_second: f32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(steps_per_second.max(0.001)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_increase_monotonically_from_start() {
        let start = Instant::now();
        let mut pacer = Pacer::new(start);
        let step = Duration::from_millis(50);
        let t1 = pacer.advance(step);
        let t2 = pacer.advance(step);
        assert_eq!(t1, start + step);
        assert_eq!(t2, start + step * 2);
        assert_eq!(pacer.steps(), 2);
    }

    #[test]
    fn remaining_ignores_sleep_overshoot() {
        let start = Instant::now();
        let mut pacer = Pacer::new(start);
        let step = Duration::from_millis(50);
        let _ = pacer.advance(step);
        // Woke 10ms late for step one; step two still targets start + 100ms.
        let late = start + Duration::from_millis(60);
        let _ = pacer.advance(step);
        assert_eq!(pacer.remaining(late), Duration::from_millis(40));
    }

    #[test]
    fn remaining_is_zero_when_behind() {
        let start = Instant::now();
        let pacer = Pacer::new(start);
        assert_eq!(
            pacer.remaining(start + Duration::from_secs(1)),
            Duration::ZERO
        );
    }

    #[test]
    fn interval_for_twenty_steps() {
        assert_eq!(interval_for_rate(20.0), Duration::from_millis(50));
    }
}
