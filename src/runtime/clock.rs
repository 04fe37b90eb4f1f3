use chrono::{DateTime, Utc};

/// Time source read by `NOW()`.
pub trait Clock: Send + Sync {
    /// Microseconds since the Unix epoch.
    fn now_micros(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_micros(&self) -> i64 {
        Utc::now().timestamp_micros()
    }
}

/// A clock stuck at one instant, for deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    micros: i64,
}

impl FixedClock {
    pub fn new(micros: i64) -> Self {
        Self { micros }
    }

    pub fn from_secs(secs: i64) -> Self {
        Self { micros: secs.saturating_mul(1_000_000) }
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self { micros: at.timestamp_micros() }
    }
}

impl Clock for FixedClock {
    fn now_micros(&self) -> i64 {
        self.micros
    }
}
