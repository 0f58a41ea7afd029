//! Regeneration clock: decides when the passive tactical-point tick is due.
//!
//! The tick runs on wall-clock time, independent of command processing.
//! It holds no state of its own; the last generation stamp lives on the
//! game_state row and is re-read before every decision.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenClock {
    pub interval: Duration,
}

impl RegenClock {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// True once a full interval has elapsed since `last_generation`.
    pub fn is_due(&self, last_generation: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - last_generation >= self.interval
    }

    /// Time left until the next tick; zero when already due.
    pub fn until_due(&self, last_generation: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
        let next = last_generation + self.interval;
        if now >= next {
            Duration::zero()
        } else {
            next - now
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_exactly_at_interval() {
        let clock = RegenClock::new(Duration::seconds(60));
        let t0 = Utc::now();
        assert!(!clock.is_due(t0, t0 + Duration::seconds(59)));
        assert!(clock.is_due(t0, t0 + Duration::seconds(60)));
        assert_eq!(clock.until_due(t0, t0 + Duration::seconds(45)), Duration::seconds(15));
        assert_eq!(clock.until_due(t0, t0 + Duration::seconds(90)), Duration::zero());
    }
}
