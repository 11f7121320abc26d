use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Token bucket throttling outbound chat posts.
#[derive(Clone)]
pub struct TokenBucket {
    capacity: f64,
    fill_rate_per_sec: f64,
    state: Arc<Mutex<BucketState>>,
}

struct BucketState {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    pub fn new(capacity: usize, fill_rate_per_sec: f64) -> Self {
        Self {
            capacity: capacity as f64,
            fill_rate_per_sec,
            state: Arc::new(Mutex::new(BucketState {
                tokens: capacity as f64,
                last_update: Instant::now(),
            })),
        }
    }

    /// Take one token if available.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        self.refill(&mut state);

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Take one token, waiting for the bucket to refill if needed.
    pub async fn acquire(&self) {
        while !self.try_acquire() {
            sleep(Duration::from_millis(50)).await;
        }
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_update).as_secs_f64();
        let new_tokens = elapsed * self.fill_rate_per_sec;
        if new_tokens > 0.0 {
            state.tokens = (state.tokens + new_tokens).min(self.capacity);
            state.last_update = now;
        }
    }
}
