//! Fixed-window request throttling for the plan endpoints.
//!
//! One limiter per endpoint class, keyed by the caller (authenticated user
//! id, else network address; key construction is the caller's concern).
//! Counters live in process memory only; nothing is shared across
//! processes, so this is a single-instance deployment tool.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Window length and request budget for one endpoint class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Length of the fixed window.
    pub window: Duration,
    /// Requests allowed per window.
    pub max: u32,
}

impl RateLimitConfig {
    /// A budget of `max` requests per `window`.
    #[must_use]
    pub const fn new(window: Duration, max: u32) -> Self {
        Self { window, max }
    }
}

/// Per-endpoint budgets for the plan boundary.
///
/// Reads get a generous budget, writes a moderate one, deletes a strict
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    /// Budget for plan reads.
    pub read: RateLimitConfig,
    /// Budget for plan upserts.
    pub write: RateLimitConfig,
    /// Budget for plan deletions.
    pub delete: RateLimitConfig,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            read: RateLimitConfig::new(Duration::from_secs(60), 60),
            write: RateLimitConfig::new(Duration::from_secs(60), 20),
            delete: RateLimitConfig::new(Duration::from_secs(60), 5),
        }
    }
}

/// What to do when the limiter itself fails.
///
/// The historical behaviour is availability over strict enforcement:
/// internal limiter errors admit the request rather than failing closed.
/// The policy is explicit so deployments (and tests) can choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Admit requests when the limiter cannot decide.
    #[default]
    Open,
    /// Reject requests when the limiter cannot decide.
    Closed,
}

/// Outcome of a limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request is within budget.
    Allowed,
    /// The budget for the current window is exhausted.
    Limited,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: Instant,
}

/// Once the key map grows past this, expired windows are swept during the
/// next check so memory stays bounded by the set of recently active
/// callers.
const SWEEP_THRESHOLD: usize = 1024;

/// Fixed-window counter limiter.
///
/// The whole map sits behind one mutex, making the read-check-increment
/// of a counter atomic per key under concurrent requests.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use itsuki_service::{Decision, FixedWindowLimiter, RateLimitConfig};
///
/// let limiter = FixedWindowLimiter::new(RateLimitConfig::new(Duration::from_secs(1), 2));
/// assert_eq!(limiter.check("u1"), Decision::Allowed);
/// assert_eq!(limiter.check("u1"), Decision::Allowed);
/// assert_eq!(limiter.check("u1"), Decision::Limited);
/// assert_eq!(limiter.check("u2"), Decision::Allowed); // separate key
/// ```
#[derive(Debug)]
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, Window>>,
    config: RateLimitConfig,
    policy: FailurePolicy,
}

impl FixedWindowLimiter {
    /// A limiter with the default fail-open policy.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_policy(config, FailurePolicy::default())
    }

    /// A limiter with an explicit failure policy.
    #[must_use]
    pub fn with_policy(config: RateLimitConfig, policy: FailurePolicy) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            config,
            policy,
        }
    }

    /// Decide whether the caller identified by `key` may proceed now.
    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    /// Decide at an explicit instant; the deterministic path `check` uses.
    pub fn check_at(&self, key: &str, now: Instant) -> Decision {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::warn!("rate limiter state poisoned; applying {:?} policy", self.policy);
                return match self.policy {
                    FailurePolicy::Open => Decision::Allowed,
                    FailurePolicy::Closed => Decision::Limited,
                };
            }
        };

        if windows.len() > SWEEP_THRESHOLD {
            let window = self.config.window;
            windows.retain(|_, entry| now.saturating_duration_since(entry.started_at) <= window);
        }

        match windows.get_mut(key) {
            Some(entry)
                if now.saturating_duration_since(entry.started_at) <= self.config.window =>
            {
                if entry.count >= self.config.max {
                    Decision::Limited
                } else {
                    entry.count += 1;
                    Decision::Allowed
                }
            }
            _ => {
                windows.insert(
                    key.to_owned(),
                    Window {
                        count: 1,
                        started_at: now,
                    },
                );
                Decision::Allowed
            }
        }
    }

    /// Drop windows that expired before `now`.
    pub fn sweep_at(&self, now: Instant) {
        if let Ok(mut windows) = self.windows.lock() {
            let window = self.config.window;
            windows.retain(|_, entry| now.saturating_duration_since(entry.started_at) <= window);
        }
    }

    /// Number of caller keys currently tracked.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.windows.lock().map(|windows| windows.len()).unwrap_or(0)
    }
}
