use std::time::{SystemTime, UNIX_EPOCH};

/// Injectable source of "now", in epoch milliseconds. Defaults to the system
/// clock; tests supply a deterministic stub so version-chain timestamps are
/// reproducible.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the unix epoch")
            .as_millis() as i64
    }
}

/// A clock that advances by a fixed step every time it is read, used in
/// tests that need a strictly increasing `valid_from` chain without
/// depending on wall-clock resolution.
#[derive(Debug)]
pub struct StepClock {
    next: std::sync::atomic::AtomicI64,
    step_ms: i64,
}

impl StepClock {
    pub fn starting_at(start_ms: i64, step_ms: i64) -> Self {
        Self {
            next: std::sync::atomic::AtomicI64::new(start_ms),
            step_ms,
        }
    }
}

impl Clock for StepClock {
    fn now_ms(&self) -> i64 {
        self.next
            .fetch_add(self.step_ms, std::sync::atomic::Ordering::SeqCst)
    }
}
