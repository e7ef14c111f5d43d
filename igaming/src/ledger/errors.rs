//! Ledger error types.

use super::models::PlayerId;
use crate::db::{self, TimedOut};
use crate::error::ErrorKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Transaction exceeded its time budget
    #[error(transparent)]
    Timeout(#[from] TimedOut),

    /// Player not found
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// Debit larger than the current balance
    #[error("Insufficient funds for player {player_id}: available {available}, required {required}")]
    InsufficientFunds {
        player_id: PlayerId,
        available: Decimal,
        required: Decimal,
    },

    /// Amount is not positive or carries more precision than stored
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Player registration data rejected
    #[error("Invalid player: {0}")]
    InvalidPlayer(String),

    /// Email already registered
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Credit would exceed the representable balance
    #[error("Balance overflow for player {0}")]
    BalanceOverflow(PlayerId),
}

impl LedgerError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Database(e) => db::classify(e),
            LedgerError::Timeout(_) => ErrorKind::ConcurrencyConflict,
            LedgerError::PlayerNotFound(_) => ErrorKind::NotFound,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::InvalidAmount(_)
            | LedgerError::InvalidPlayer(_)
            | LedgerError::BalanceOverflow(_) => ErrorKind::Validation,
            LedgerError::DuplicateEmail(_) => ErrorKind::Conflict,
        }
    }

    /// Get a client-safe error message
    ///
    /// Database errors are replaced by a generic message so SQL details never leak.
    pub fn client_message(&self) -> String {
        match self {
            LedgerError::Database(_) if self.kind() == ErrorKind::ConcurrencyConflict => {
                "Concurrent update conflict, please retry".to_string()
            }
            LedgerError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn test_kinds() {
        assert_eq!(LedgerError::PlayerNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(
            LedgerError::InsufficientFunds {
                player_id: 1,
                available: dec!(40),
                required: dec!(50),
            }
            .kind(),
            ErrorKind::InsufficientFunds
        );
        assert_eq!(
            LedgerError::Timeout(TimedOut(Duration::from_secs(1))).kind(),
            ErrorKind::ConcurrencyConflict
        );
        assert_eq!(
            LedgerError::DuplicateEmail("a@b.c".into()).kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn test_client_message_hides_database_details() {
        let err = LedgerError::Database(sqlx::Error::Protocol("secret detail".into()));
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = LedgerError::InsufficientFunds {
            player_id: 7,
            available: dec!(40),
            required: dec!(50),
        };
        let msg = err.client_message();
        assert!(msg.contains("40"));
        assert!(msg.contains("50"));
    }
}
