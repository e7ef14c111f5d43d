//! Settlement error types.

use crate::db::{self, TimedOut};
use crate::error::ErrorKind;
use crate::ledger::LedgerError;
use crate::tournament::{TournamentError, TournamentId};
use crate::wager::WagerError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Settlement errors
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Timeout(#[from] TimedOut),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Tournament(#[from] TournamentError),

    #[error(transparent)]
    Wager(#[from] WagerError),

    #[error("Tournament {0} is already settled")]
    AlreadySettled(TournamentId),

    #[error("Tournament {0} has no bets to settle")]
    NoEligibleParticipants(TournamentId),
}

impl SettlementError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SettlementError::Database(e) => db::classify(e),
            SettlementError::Timeout(_) => ErrorKind::ConcurrencyConflict,
            SettlementError::Ledger(e) => e.kind(),
            SettlementError::Tournament(e) => e.kind(),
            SettlementError::Wager(e) => e.kind(),
            SettlementError::AlreadySettled(_) => ErrorKind::AlreadySettled,
            SettlementError::NoEligibleParticipants(_) => ErrorKind::NoEligibleParticipants,
        }
    }

    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            SettlementError::Ledger(e) => e.client_message(),
            SettlementError::Tournament(e) => e.client_message(),
            SettlementError::Wager(e) => e.client_message(),
            SettlementError::Database(_) if self.kind() == ErrorKind::ConcurrencyConflict => {
                "Concurrent update conflict, please retry".to_string()
            }
            SettlementError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for settlement operations
pub type EngineResult<T> = Result<T, SettlementError>;

/// Rejected payout schedule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Payout schedule must list at least one fraction")]
    Empty,

    #[error("Payout fraction {0} is outside [0, 1]")]
    InvalidFraction(Decimal),

    #[error("Payout fractions sum to {0}, more than the whole pool")]
    ExceedsPool(Decimal),

    #[error("Unparsable payout fraction: {0:?}")]
    Unparsable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            SettlementError::AlreadySettled(1).kind(),
            ErrorKind::AlreadySettled
        );
        assert_eq!(
            SettlementError::NoEligibleParticipants(1).kind(),
            ErrorKind::NoEligibleParticipants
        );
        assert_eq!(
            SettlementError::from(TournamentError::NotFound(1)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SettlementError::from(TournamentError::AlreadySettled(1)).kind(),
            ErrorKind::AlreadySettled
        );
    }

    #[test]
    fn test_client_message() {
        assert_eq!(
            SettlementError::NoEligibleParticipants(12).client_message(),
            "Tournament 12 has no bets to settle"
        );
        assert_eq!(
            SettlementError::Database(sqlx::Error::RowNotFound).client_message(),
            "Internal server error"
        );
    }
}
