//! Wager error types.

use crate::db::{self, TimedOut};
use crate::error::ErrorKind;
use crate::ledger::LedgerError;
use crate::tournament::{TournamentError, TournamentId};
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Why a tournament refused a bet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotOpenReason {
    Settled,
    Ended,
}

impl fmt::Display for NotOpenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotOpenReason::Settled => f.write_str("already settled"),
            NotOpenReason::Ended => f.write_str("past its end time"),
        }
    }
}

/// Wager errors
#[derive(Debug, Error)]
pub enum WagerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Timeout(#[from] TimedOut),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Tournament(#[from] TournamentError),

    #[error("Tournament {tournament_id} is not accepting bets: {reason}")]
    TournamentNotOpen {
        tournament_id: TournamentId,
        reason: NotOpenReason,
    },

    #[error("Invalid bet amount: {0}")]
    InvalidAmount(Decimal),
}

impl WagerError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            WagerError::Database(e) => db::classify(e),
            WagerError::Timeout(_) => ErrorKind::ConcurrencyConflict,
            WagerError::Ledger(e) => e.kind(),
            WagerError::Tournament(e) => e.kind(),
            WagerError::TournamentNotOpen { .. } => ErrorKind::TournamentNotOpen,
            WagerError::InvalidAmount(_) => ErrorKind::Validation,
        }
    }

    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            WagerError::Ledger(e) => e.client_message(),
            WagerError::Tournament(e) => e.client_message(),
            WagerError::Database(_) if self.kind() == ErrorKind::ConcurrencyConflict => {
                "Concurrent update conflict, please retry".to_string()
            }
            WagerError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type WagerResult<T> = Result<T, WagerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kinds_follow_wrapped_errors() {
        assert_eq!(
            WagerError::from(LedgerError::PlayerNotFound(3)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            WagerError::from(TournamentError::NotFound(9)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            WagerError::from(LedgerError::InsufficientFunds {
                player_id: 1,
                available: dec!(40),
                required: dec!(50),
            })
            .kind(),
            ErrorKind::InsufficientFunds
        );
    }

    #[test]
    fn test_not_open_message() {
        let err = WagerError::TournamentNotOpen {
            tournament_id: 4,
            reason: NotOpenReason::Settled,
        };
        assert_eq!(err.kind(), ErrorKind::TournamentNotOpen);
        assert_eq!(
            err.client_message(),
            "Tournament 4 is not accepting bets: already settled"
        );
    }

    #[test]
    fn test_wrapped_database_error_is_sanitized() {
        let err = WagerError::from(LedgerError::Database(sqlx::Error::Protocol(
            "relation players".into(),
        )));
        assert_eq!(err.client_message(), "Internal server error");
    }
}
