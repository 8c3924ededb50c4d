use jiff::Timestamp;

/// Wall-clock source, injectable so expiry math can run against simulated
/// time in tests. Monotonicity is not required; the refresh margin absorbs
/// ordinary clock adjustments.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
