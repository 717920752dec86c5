//! Cool-down gate for manual refresh requests

use std::time::Duration;

use serde::{Deserialize, Serialize};

const MINUTE_MS: u64 = 60_000;

/// Whether a manual refresh would currently be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    Idle,
    CoolingDown,
}

/// Outcome of a manual refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RefreshDecision {
    Allowed,
    CoolingDown { remaining_minutes: u64 },
}

/// Tracks the last successful fetch and gates manual refreshes behind a
/// cool-down anchored at it.
#[derive(Debug, Clone)]
pub struct RefreshController {
    cooldown: Duration,
    last_fetched_ms: Option<u64>,
}

impl RefreshController {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fetched_ms: None,
        }
    }

    /// Cool-down length in whole minutes, rounded up
    pub fn cooldown_minutes(&self) -> u64 {
        self.cooldown_ms().div_ceil(MINUTE_MS)
    }

    pub fn last_fetched_ms(&self) -> Option<u64> {
        self.last_fetched_ms
    }

    pub fn state(&self, now_ms: u64) -> RefreshState {
        match self.remaining_ms(now_ms) {
            Some(_) => RefreshState::CoolingDown,
            None => RefreshState::Idle,
        }
    }

    /// Decide a manual refresh request made at `now_ms`. Does not change state.
    pub fn request(&self, now_ms: u64) -> RefreshDecision {
        match self.remaining_ms(now_ms) {
            Some(remaining) => RefreshDecision::CoolingDown {
                remaining_minutes: remaining.div_ceil(MINUTE_MS),
            },
            None => RefreshDecision::Allowed,
        }
    }

    /// Anchor the cool-down at the latest successful fetch
    pub fn record_success(&mut self, fetched_ms: u64) {
        tracing::debug!("Cool-down anchored at {} ms", fetched_ms);
        self.last_fetched_ms = Some(fetched_ms);
    }

    fn cooldown_ms(&self) -> u64 {
        u64::try_from(self.cooldown.as_millis()).unwrap_or(u64::MAX)
    }

    fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        let deadline = self.last_fetched_ms?.saturating_add(self.cooldown_ms());
        if now_ms < deadline {
            Some(deadline - now_ms)
        } else {
            None
        }
    }
}

/// Status line shown when a refresh request is rejected
pub fn cooldown_message(cooldown_minutes: u64, remaining_minutes: u64) -> String {
    format!(
        "直近取得から{}分は再取得を待ちます。あと{}分で再取得できます。",
        cooldown_minutes, remaining_minutes
    )
}
