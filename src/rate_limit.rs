//! Per-scope command admission control.
//!
//! Every command carries a [`RateLimitPolicy`]: at most `burst` invocations per
//! fixed window of `interval`. Budgets are tracked independently for each
//! [`ScopeKey`] (channel x command). A fixed window can admit up to twice the
//! burst across a window edge; that is accepted.

use std::fmt;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::PolicyError;

/// Immutable `(burst, interval)` declaration attached to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    burst: u32,
    interval: Duration,
}

impl RateLimitPolicy {
    /// Validated constructor for policies read at registration time.
    pub fn new(burst: u32, interval: Duration) -> Result<Self, PolicyError> {
        if burst == 0 {
            return Err(PolicyError::ZeroBurst);
        }
        if interval.is_zero() {
            return Err(PolicyError::ZeroInterval);
        }
        Ok(Self { burst, interval })
    }

    /// Policy for built-in commands. Invalid literals fail at compile time when
    /// used in a `const`.
    pub const fn per_secs(burst: u32, interval_secs: u64) -> Self {
        assert!(burst > 0, "rate limit burst must be positive");
        assert!(interval_secs > 0, "rate limit interval must be positive");
        Self {
            burst,
            interval: Duration::from_secs(interval_secs),
        }
    }

    pub fn burst(&self) -> u32 {
        self.burst
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl fmt::Display for RateLimitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}ms", self.burst, self.interval.as_millis())
    }
}

/// What a budget is shared by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeTarget {
    /// Every user in the channel draws from one budget.
    Channel(u64),
    /// Fallback for invocations that arrive without a channel.
    User(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    target: ScopeTarget,
    command: String,
}

impl ScopeKey {
    pub fn new(target: ScopeTarget, command: impl Into<String>) -> Self {
        Self {
            target,
            command: command.into(),
        }
    }

    /// Key for one resolved invocation. A channel always wins over the user;
    /// without one the author gets a private budget.
    pub fn for_invocation(channel_id: Option<u64>, user_id: u64, command: &str) -> Self {
        let target = match channel_id {
            Some(id) => ScopeTarget::Channel(id),
            None => ScopeTarget::User(user_id),
        };
        Self::new(target, command)
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            ScopeTarget::Channel(id) => write!(f, "channel:{}:{}", id, self.command),
            ScopeTarget::User(id) => write!(f, "user:{}:{}", id, self.command),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Rejected,
}

impl Admission {
    pub fn is_admitted(self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Monotonic time source for admission decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy)]
struct RateLimitState {
    window_start: Instant,
    count: u32,
    /// Interval of the policy that last touched this scope.
    interval: Duration,
}

/// Fixed-window counters keyed by scope.
///
/// The map is sharded, so the check-and-increment for one key holds only that
/// key's shard lock and never blocks unrelated channels on other shards.
#[derive(Default)]
pub struct RateLimiter {
    states: DashMap<ScopeKey, RateLimitState>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_admit(&self, key: &ScopeKey, policy: &RateLimitPolicy, now: Instant) -> Admission {
        if let Some(mut state) = self.states.get_mut(key) {
            return Self::admit_existing(&mut state, policy, now);
        }

        // Another caller may insert between the lookup above and the entry
        // below; the entry lock makes the final decision.
        let mut state = self
            .states
            .entry(key.clone())
            .or_insert(RateLimitState {
                window_start: now,
                count: 0,
                interval: policy.interval,
            });
        Self::admit_existing(&mut state, policy, now)
    }

    fn admit_existing(
        state: &mut RateLimitState,
        policy: &RateLimitPolicy,
        now: Instant,
    ) -> Admission {
        state.interval = policy.interval;
        // A clock that went backwards yields None: keep the current window.
        let expired = now
            .checked_duration_since(state.window_start)
            .is_some_and(|elapsed| elapsed >= policy.interval);
        if expired {
            state.window_start = now;
            state.count = 0;
        }

        if state.count < policy.burst {
            state.count += 1;
            Admission::Admitted
        } else {
            Admission::Rejected
        }
    }

    /// Drop scopes whose window started at least `max_idle` before `now`.
    /// A scope whose window is still open under its own policy is kept even
    /// when it is older than `max_idle`.
    pub fn prune_idle(&self, now: Instant, max_idle: Duration) -> usize {
        let before = self.states.len();
        self.states.retain(|_, state| {
            now.saturating_duration_since(state.window_start) < max_idle.max(state.interval)
        });
        before.saturating_sub(self.states.len())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }
}
