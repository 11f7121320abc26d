use chrono::Utc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Source of the current time in epoch milliseconds.
pub trait TimeProvider: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Source of opaque correlation ids.
pub trait IdProvider: Send + Sync {
    fn new_id(&self) -> String;
}

/// Clock and id generator handed to the normalizer.
/// Tests swap in the deterministic providers so ids and timestamps are predictable.
#[derive(Clone)]
pub struct RelayContext {
    pub time: Arc<dyn TimeProvider>,
    pub id: Arc<dyn IdProvider>,
}

impl RelayContext {
    pub fn new_system() -> Self {
        Self {
            time: Arc::new(SystemTimeProvider),
            id: Arc::new(RandomIdProvider),
        }
    }

    pub fn new_deterministic(start_time_ms: i64) -> Self {
        Self {
            time: Arc::new(FixedTimeProvider::new(start_time_ms)),
            id: Arc::new(SequentialIdProvider::default()),
        }
    }
}

pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

pub struct RandomIdProvider;

impl IdProvider for RandomIdProvider {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

pub struct FixedTimeProvider {
    current_time_ms: AtomicI64,
}

impl FixedTimeProvider {
    pub fn new(start_time_ms: i64) -> Self {
        Self {
            current_time_ms: AtomicI64::new(start_time_ms),
        }
    }

    pub fn advance(&self, duration_ms: i64) {
        self.current_time_ms.fetch_add(duration_ms, Ordering::SeqCst);
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now_millis(&self) -> i64 {
        self.current_time_ms.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct SequentialIdProvider {
    counter: AtomicU64,
}

impl IdProvider for SequentialIdProvider {
    fn new_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("00000000-0000-0000-0000-{:012x}", n)
    }
}
