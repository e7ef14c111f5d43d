//! Tournament error types.

use super::models::TournamentId;
use crate::db::{self, TimedOut};
use crate::error::ErrorKind;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Timeout(#[from] TimedOut),

    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("Tournament {0} is already settled")]
    AlreadySettled(TournamentId),

    #[error("Tournament name is required")]
    InvalidName,

    #[error("Prize pool must be a positive amount, got {0}")]
    InvalidPrizePool(Decimal),

    #[error("End time {end_time} must be after start time {start_time}")]
    InvalidSchedule {
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
}

impl TournamentError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::Database(e) => db::classify(e),
            TournamentError::Timeout(_) => ErrorKind::ConcurrencyConflict,
            TournamentError::NotFound(_) => ErrorKind::NotFound,
            TournamentError::AlreadySettled(_) => ErrorKind::AlreadySettled,
            TournamentError::InvalidName
            | TournamentError::InvalidPrizePool(_)
            | TournamentError::InvalidSchedule { .. } => ErrorKind::Validation,
        }
    }

    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::Database(_) if self.kind() == ErrorKind::ConcurrencyConflict => {
                "Concurrent update conflict, please retry".to_string()
            }
            TournamentError::Database(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type TournamentResult<T> = Result<T, TournamentError>;
