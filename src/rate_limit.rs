use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

struct Bucket {
    count: u32,
    window_start: Instant,
}

/// Keyed fixed-window limiter: every key gets its own bucket of `limit`
/// permits that refills in full once `window` has elapsed since the window
/// opened. `allow` never blocks or queues; a denied caller just gets `false`.
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Consumes one permit for `key` if any remain in the current window.
    /// Keys never seen before start with a full bucket.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock();
        let bucket = buckets.entry(key.to_owned()).or_insert(Bucket {
            count: 0,
            window_start: now,
        });

        if now.duration_since(bucket.window_start) >= self.window {
            bucket.count = 0;
            bucket.window_start = now;
        }

        if bucket.count < self.limit {
            bucket.count += 1;
            true
        } else {
            false
        }
    }
}
