use crate::Error;
use std::{
    str::FromStr,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::time::Instant;

/// Source of timestamps in milliseconds. Successive readings are not required
/// to increase.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> i64;
}

/// Wall-clock time, subject to system clock adjustments.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_millis() as i64,
            Err(error) => -(error.duration().as_millis() as i64),
        }
    }
}

/// Milliseconds since construction, read from the tokio clock so that it
/// follows paused time in tests.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockKind {
    Wall,
    Monotonic,
}

impl ClockKind {
    pub fn build(self) -> Arc<dyn Clock> {
        match self {
            ClockKind::Wall => Arc::new(SystemClock),
            ClockKind::Monotonic => Arc::new(MonotonicClock::new()),
        }
    }
}

impl FromStr for ClockKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "wall" => Ok(ClockKind::Wall),
            "monotonic" => Ok(ClockKind::Monotonic),
            _ => Err(Error::new(format!(r#"Unknown clock "{}""#, value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn system_clock_is_past_epoch() {
        assert!(SystemClock.now() > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn monotonic_clock_follows_tokio_time() {
        let clock = MonotonicClock::new();
        assert_eq!(clock.now(), 0);
        tokio::time::advance(Duration::from_millis(250)).await;
        assert_eq!(clock.now(), 250);
    }

    #[test]
    fn clock_kind_from_str() {
        assert_eq!("wall".parse::<ClockKind>(), Ok(ClockKind::Wall));
        assert_eq!("monotonic".parse::<ClockKind>(), Ok(ClockKind::Monotonic));
        assert!("sundial".parse::<ClockKind>().is_err());
    }
}
