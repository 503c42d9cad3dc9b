//! Time source
//!
//! Transitions read time once per call and never sleep. The delay check
//! is a pure comparison against the injected clock, so tests substitute a
//! manual clock and property tests sweep the boundary.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tug_identity::Timestamp;

/// Source of the current time for delay checks
pub trait Clock: Send + Sync {
    /// The current time
    fn now(&self) -> Timestamp;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Wall clock backed by [`SystemTime`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Timestamp::from_secs(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_past_2020() {
        let now = SystemClock.now();
        assert!(now.as_secs() > 1_577_836_800);
    }

    #[test]
    fn references_delegate() {
        let clock = SystemClock;
        let by_ref: &dyn Clock = &clock;
        assert!(by_ref.now().as_secs() > 0);
        assert!(Arc::new(clock).now().as_secs() > 0);
    }
}
