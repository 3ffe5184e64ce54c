use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{self, ClientStore, QUOTA_KEY};

pub const MAX_QUERIES_PER_DAY: u32 = 25;

/// Length of the rolling window, counted from the last reset
pub const WINDOW_HOURS: i64 = 24;

/// Persisted counter of successful lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaState {
    pub count: u32,
    pub window_expiry: DateTime<Utc>,
}

impl QuotaState {
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            window_expiry: now + Duration::hours(WINDOW_HOURS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.window_expiry
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed,
    Denied(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    DailyLimitReached,
}

/// Per-client daily lookup counter.
///
/// Each persisted copy is its own authority; nothing is synchronized
/// across devices or processes.
#[derive(Debug, Clone)]
pub struct QuotaTracker {
    limit: u32,
    state: Option<QuotaState>,
}

impl Default for QuotaTracker {
    fn default() -> Self {
        Self::new(MAX_QUERIES_PER_DAY)
    }
}

impl QuotaTracker {
    pub fn new(limit: u32) -> Self {
        Self { limit, state: None }
    }

    pub fn from_state(limit: u32, state: Option<QuotaState>) -> Self {
        Self { limit, state }
    }

    /// Restore from client storage; absent or corrupt state counts as unused
    pub fn load<S: ClientStore + ?Sized>(store: &S, limit: u32) -> Self {
        Self::from_state(limit, storage::load_record(store, QUOTA_KEY))
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn state(&self) -> Option<QuotaState> {
        self.state
    }

    /// State that applies at `now`, ignoring an expired window
    fn active(&self, now: DateTime<Utc>) -> Option<QuotaState> {
        self.state.filter(|s| !s.is_expired(now))
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> u32 {
        let used = self.active(now).map_or(0, |s| s.count);
        self.limit.saturating_sub(used)
    }

    pub fn window_expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.active(now).map(|s| s.window_expiry)
    }

    /// Count one successful lookup if the window still has room
    pub fn check_and_consume(&mut self, now: DateTime<Utc>) -> QuotaDecision {
        let mut state = self
            .active(now)
            .unwrap_or_else(|| QuotaState::fresh(now));

        if state.count >= self.limit {
            return QuotaDecision::Denied(DenyReason::DailyLimitReached);
        }

        state.count += 1;
        self.state = Some(state);
        QuotaDecision::Allowed
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.state = Some(QuotaState::fresh(now));
    }
}
