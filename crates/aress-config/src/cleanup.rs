//! Retry policy for removing a profile after its identity has been deleted.
//!
//! # Environment Variables
//!
//! - `CLEANUP_MAX_ATTEMPTS`: attempts before giving up (default: 5)
//! - `CLEANUP_BASE_DELAY_MS`: delay before the first retry (default: 500)
//! - `CLEANUP_MAX_DELAY_MS`: cap for the doubling delay (default: 30000)

use std::time::Duration;

use crate::{env_lookup, parse_or};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanupConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl CleanupConfig {
    pub fn from_env() -> Self {
        Self::from_vars(env_lookup)
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_attempts: parse_or(&lookup, "CLEANUP_MAX_ATTEMPTS", defaults.max_attempts),
            base_delay: Duration::from_millis(parse_or(&lookup, "CLEANUP_BASE_DELAY_MS", 500)),
            max_delay: Duration::from_millis(parse_or(&lookup, "CLEANUP_MAX_DELAY_MS", 30_000)),
        }
    }

    /// Delay before attempt `attempt` (1-based): the base delay doubled per
    /// previous attempt, capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}
