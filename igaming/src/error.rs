//! Failure classification shared by every engine operation.

use serde::Serialize;
use std::fmt;

/// Coarse failure category.
///
/// Each module keeps its own error enum with full context; callers that only need
/// to decide how to react (report, retry, map to a transport status) match on the
/// kind instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced player or tournament does not exist
    NotFound,
    /// A debit would take the balance below zero
    InsufficientFunds,
    /// The tournament no longer accepts bets
    TournamentNotOpen,
    /// The tournament has already been settled
    AlreadySettled,
    /// Settlement was requested for a tournament without bets
    NoEligibleParticipants,
    /// Lock timeout, deadlock or serialization failure; the whole operation may be retried
    ConcurrencyConflict,
    /// Caller input rejected before touching storage
    Validation,
    /// A uniqueness rule was violated (e.g. an email already registered)
    Conflict,
    /// Storage or infrastructure failure
    Internal,
}

impl ErrorKind {
    /// Whether repeating the same operation can succeed without changing the input.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::ConcurrencyConflict)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::TournamentNotOpen => "tournament_not_open",
            ErrorKind::AlreadySettled => "already_settled",
            ErrorKind::NoEligibleParticipants => "no_eligible_participants",
            ErrorKind::ConcurrencyConflict => "concurrency_conflict",
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_conflicts_are_retryable() {
        assert!(ErrorKind::ConcurrencyConflict.is_retryable());
        assert!(!ErrorKind::InsufficientFunds.is_retryable());
        assert!(!ErrorKind::AlreadySettled.is_retryable());
        assert!(!ErrorKind::Internal.is_retryable());
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(ErrorKind::TournamentNotOpen.to_string(), "tournament_not_open");
        assert_eq!(ErrorKind::ConcurrencyConflict.to_string(), "concurrency_conflict");
    }
}
