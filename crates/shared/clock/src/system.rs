use chrono::{DurationRound, TimeDelta, Utc};
use papertrade_core::Timestamp;
use papertrade_ports::Clock;

/// Wall-clock time, truncated to the millisecond
///
/// Browser clients parse `lastUpdated` and `createdAt` into millisecond
/// dates, so both sides agree on an order's time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = Utc::now();
        now.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(now)
    }

    fn name(&self) -> &str {
        "system"
    }
}
