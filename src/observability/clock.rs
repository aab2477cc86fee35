/// Millisecond timestamp sources for the profiled invoker
use crate::config::loader::ClockKind;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Monotonic milliseconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_millis(&self) -> u64 {
        self.anchor.elapsed().as_millis() as u64
    }
}

/// Calendar milliseconds since the Unix epoch. Can step backwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

pub fn clock_for(kind: ClockKind) -> Box<dyn Clock> {
    match kind {
        ClockKind::Monotonic => Box::new(MonotonicClock::new()),
        ClockKind::System => Box::new(SystemClock),
    }
}
