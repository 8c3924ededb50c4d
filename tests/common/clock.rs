use std::sync::Mutex;

use jiff::Timestamp;
use modmed_gateway::token::Clock;

/// Hand-advanced clock so expiry tests run against simulated time.
pub struct ManualClock {
    now_ms: Mutex<i64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: Mutex::new(start_ms),
        }
    }

    pub fn set(&self, ms: i64) {
        *self.now_ms.lock().expect("clock poisoned") = ms;
    }

    pub fn advance(&self, ms: i64) {
        *self.now_ms.lock().expect("clock poisoned") += ms;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millisecond(*self.now_ms.lock().expect("clock poisoned"))
            .expect("timestamp in range")
    }
}
