use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Per-user sliding-window counter for insight requests.
///
/// In-memory and reset on process restart; the type is the seam where an
/// externally backed counter would slot in for multi-instance deployments.
pub struct SlidingWindowLimiter {
    limit: usize,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
}

#[derive(Debug, thiserror::Error)]
#[error("rate limit exceeded; retry shortly")]
pub struct RateLimitExceeded;

impl SlidingWindowLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit: limit as usize,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, Duration::minutes(1))
    }

    /// Record one request for `key` at `now`, rejecting it if the window is
    /// already full. Requests older than the window slide out first.
    pub fn check(&self, key: &str, now: DateTime<Utc>) -> Result<(), RateLimitExceeded> {
        let mut hits = self.hits.lock().expect("rate limiter mutex poisoned");
        let window_start = now - self.window;
        let entry = hits.entry(key.to_string()).or_default();

        while entry.front().is_some_and(|hit| *hit <= window_start) {
            entry.pop_front();
        }

        if entry.len() >= self.limit {
            return Err(RateLimitExceeded);
        }

        entry.push_back(now);
        Ok(())
    }
}
