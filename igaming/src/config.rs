//! Engine configuration.

use crate::db::config::parse_env_or;
use crate::db::timeouts::{DEFAULT_LOCK_TIMEOUT, DEFAULT_TRANSACTION_TIMEOUT};
use crate::settlement::{PayoutSchedule, ScheduleError};
use std::time::Duration;

/// Settings shared by the ledger, wager store, tournament store and settlement engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Longest a single row-lock wait may block before failing with a conflict
    pub lock_timeout: Duration,
    /// Longest a whole engine transaction may run
    pub transaction_timeout: Duration,
    /// Fractions of the prize pool paid to placements 1..=K
    pub payout_schedule: PayoutSchedule,
    /// Accept bets on open tournaments whose end time has passed
    pub allow_bets_after_end: bool,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// - `LOCK_TIMEOUT_MS` (default: 5000)
    /// - `TRANSACTION_TIMEOUT_MS` (default: 10000)
    /// - `PAYOUT_SCHEDULE`: comma-separated pool fractions (default: `0.5,0.3,0.2`)
    /// - `BET_AFTER_END_ALLOWED` (default: false)
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] if `PAYOUT_SCHEDULE` is set but invalid.
    pub fn from_env() -> Result<Self, ScheduleError> {
        let payout_schedule = match std::env::var("PAYOUT_SCHEDULE") {
            Ok(raw) => raw.parse()?,
            Err(_) => PayoutSchedule::standard(),
        };

        Ok(Self {
            lock_timeout: Duration::from_millis(parse_env_or(
                "LOCK_TIMEOUT_MS",
                DEFAULT_LOCK_TIMEOUT.as_millis() as u64,
            )),
            transaction_timeout: Duration::from_millis(parse_env_or(
                "TRANSACTION_TIMEOUT_MS",
                DEFAULT_TRANSACTION_TIMEOUT.as_millis() as u64,
            )),
            payout_schedule,
            allow_bets_after_end: parse_env_or("BET_AFTER_END_ALLOWED", false),
        })
    }

    /// Replace the payout schedule
    pub fn with_payout_schedule(mut self, schedule: PayoutSchedule) -> Self {
        self.payout_schedule = schedule;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
            payout_schedule: PayoutSchedule::standard(),
            allow_bets_after_end: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.lock_timeout, Duration::from_secs(5));
        assert_eq!(config.transaction_timeout, Duration::from_secs(10));
        assert_eq!(config.payout_schedule, PayoutSchedule::standard());
        assert!(!config.allow_bets_after_end);
    }

    #[test]
    fn test_lock_timeout_shorter_than_transaction_timeout() {
        let config = EngineConfig::default();
        assert!(config.lock_timeout < config.transaction_timeout);
    }
}
