//! Bounded backoff schedule

use std::time::Duration;

use crate::config::PollPolicy;

/// Delay generator for successive polls of one job
///
/// Delays are kept in whole milliseconds. Each step multiplies the current
/// delay by the growth factor (rounded to the nearest millisecond) and caps
/// it at the ceiling, so the sequence never decreases and never exceeds the
/// ceiling.
#[derive(Debug, Clone)]
pub struct Backoff {
    current_ms: u64,
    growth_factor: f64,
    ceiling_ms: u64,
}

impl Backoff {
    pub fn new(policy: &PollPolicy) -> Self {
        let ceiling_ms = duration_ms(policy.ceiling);
        Self {
            current_ms: duration_ms(policy.base_interval).min(ceiling_ms),
            growth_factor: policy.growth_factor.max(1.0),
            ceiling_ms,
        }
    }

    /// Delay that the next wait will use
    pub fn current(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    /// Returns the delay to wait now and grows the schedule for the next wait
    pub fn advance(&mut self) -> Duration {
        let delay = self.current();
        let grown = (self.current_ms as f64 * self.growth_factor).round() as u64;
        self.current_ms = grown.clamp(self.current_ms, self.ceiling_ms);
        delay
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_schedule() {
        let mut backoff = Backoff::new(&PollPolicy::default());
        let delays: Vec<u64> = (0..7).map(|_| backoff.advance().as_millis() as u64).collect();
        assert_eq!(delays, vec![5000, 6500, 8450, 10985, 14281, 15000, 15000]);
    }

    #[test]
    fn test_never_decreases_and_respects_ceiling() {
        let policy = PollPolicy::new(Duration::from_millis(700), 1.7, Duration::from_secs(9));
        let mut backoff = Backoff::new(&policy);
        let mut previous = Duration::ZERO;
        for _ in 0..50 {
            let delay = backoff.advance();
            assert!(delay >= previous);
            assert!(delay <= policy.ceiling);
            previous = delay;
        }
        assert_eq!(previous, policy.ceiling);
    }

    #[test]
    fn test_unit_growth_is_constant() {
        let policy = PollPolicy::new(Duration::from_secs(2), 1.0, Duration::from_secs(15));
        let mut backoff = Backoff::new(&policy);
        assert_eq!(backoff.advance(), Duration::from_secs(2));
        assert_eq!(backoff.advance(), Duration::from_secs(2));
    }

    #[test]
    fn test_base_above_ceiling_is_capped() {
        let policy = PollPolicy::new(Duration::from_secs(30), 1.3, Duration::from_secs(15));
        let backoff = Backoff::new(&policy);
        assert_eq!(backoff.current(), Duration::from_secs(15));
    }
}
