//! Fixed-window submission throttle keyed by client identity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::RateLimitConfig;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Submissions counted for one client in its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_reset_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("rate limit store unavailable: {0}")]
    Unavailable(String),
}

/// Storage seam for rate-limit entries.
pub trait RateLimitStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<RateLimitEntry>, StoreError>;
    fn set(&self, key: &str, entry: RateLimitEntry) -> Result<(), StoreError>;
}

/// Process-local table. Entries live as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl InMemoryRateLimitStore {
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("rate limit store mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn get(&self, key: &str) -> Result<Option<RateLimitEntry>, StoreError> {
        let entries = self
            .entries
            .lock()
            .expect("rate limit store mutex poisoned");
        Ok(entries.get(key).copied())
    }

    fn set(&self, key: &str, entry: RateLimitEntry) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .expect("rate limit store mutex poisoned");
        entries.insert(key.to_string(), entry);
        Ok(())
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed { count: u32 },
    Denied { retry_after_secs: u64 },
}

pub struct RateLimiter<S> {
    store: Arc<S>,
    window: TimeDelta,
    max_requests: u32,
    admission: Mutex<()>,
}

impl<S> RateLimiter<S>
where
    S: RateLimitStore,
{
    pub fn new(store: Arc<S>, config: RateLimitConfig) -> Self {
        let window = TimeDelta::from_std(config.window).unwrap_or(TimeDelta::MAX);
        Self {
            store,
            window,
            max_requests: config.max_requests,
            admission: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Counts one submission for `key` at `now`.
    ///
    /// The read and the write happen under one lock, so two concurrent calls for
    /// the same key can never both see room left in the window.
    pub fn admit(&self, key: &str, now: DateTime<Utc>) -> Result<Admission, StoreError> {
        let _serial = self.admission.lock().expect("rate limiter mutex poisoned");

        match self.store.get(key)? {
            Some(entry) if now < entry.window_reset_at => {
                if entry.count < self.max_requests {
                    let count = entry.count + 1;
                    self.store.set(key, RateLimitEntry { count, ..entry })?;
                    Ok(Admission::Allowed { count })
                } else {
                    Ok(Admission::Denied {
                        retry_after_secs: seconds_until(now, entry.window_reset_at),
                    })
                }
            }
            _ => {
                let window_reset_at = now
                    .checked_add_signed(self.window)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                self.store.set(
                    key,
                    RateLimitEntry {
                        count: 1,
                        window_reset_at,
                    },
                )?;
                Ok(Admission::Allowed { count: 1 })
            }
        }
    }
}

fn seconds_until(now: DateTime<Utc>, reset_at: DateTime<Utc>) -> u64 {
    let millis = (reset_at - now).num_milliseconds().max(0) as u64;
    millis.div_ceil(1000).max(1)
}
