//! Ledger data models.

use crate::tournament::TournamentId;
use crate::wager::BetId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Player ID type
pub type PlayerId = i64;

/// Player model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub email: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration data for a new player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub email: String,
    /// Opening deposit, recorded as a ledger entry when positive
    #[serde(default)]
    pub initial_balance: Decimal,
}

impl NewPlayer {
    pub fn new(name: impl Into<String>, email: impl Into<String>, initial_balance: Decimal) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            initial_balance,
        }
    }
}

/// Ledger entry model, one per balance mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub player_id: PlayerId,
    /// Signed: negative for debits
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub direction: EntryDirection,
    pub entry_type: EntryType,
    pub tournament_id: Option<TournamentId>,
    /// Set on wager debits
    pub bet_id: Option<BetId>,
    pub created_at: DateTime<Utc>,
}

/// Entry direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    Debit,
    Credit,
}

impl EntryDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryDirection::Debit => "debit",
            EntryDirection::Credit => "credit",
        }
    }
}

impl fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryDirection {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(EntryDirection::Debit),
            "credit" => Ok(EntryDirection::Credit),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// What caused a balance mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Money entering the system from outside
    Deposit,
    /// Stake taken for a bet
    Wager,
    /// Prize paid by settlement
    Prize,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Deposit => "deposit",
            EntryType::Wager => "wager",
            EntryType::Prize => "prize",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(EntryType::Deposit),
            "wager" => Ok(EntryType::Wager),
            "prize" => Ok(EntryType::Prize),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Stored enum value not recognized by this build
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

/// Context recorded alongside a debit or credit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub entry_type: EntryType,
    pub tournament_id: Option<TournamentId>,
    pub bet_id: Option<BetId>,
}

impl Posting {
    pub fn deposit() -> Self {
        Self {
            entry_type: EntryType::Deposit,
            tournament_id: None,
            bet_id: None,
        }
    }

    pub fn wager(tournament_id: TournamentId, bet_id: BetId) -> Self {
        Self {
            entry_type: EntryType::Wager,
            tournament_id: Some(tournament_id),
            bet_id: Some(bet_id),
        }
    }

    pub fn prize(tournament_id: TournamentId) -> Self {
        Self {
            entry_type: EntryType::Prize,
            tournament_id: Some(tournament_id),
            bet_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_enums_round_trip_through_storage_names() {
        for direction in [EntryDirection::Debit, EntryDirection::Credit] {
            assert_eq!(direction.as_str().parse::<EntryDirection>(), Ok(direction));
        }
        for entry_type in [EntryType::Deposit, EntryType::Wager, EntryType::Prize] {
            assert_eq!(entry_type.as_str().parse::<EntryType>(), Ok(entry_type));
        }
        assert!("bonus".parse::<EntryType>().is_err());
    }

    #[test]
    fn test_postings() {
        assert_eq!(Posting::deposit().tournament_id, None);
        assert_eq!(Posting::wager(3, 8).entry_type, EntryType::Wager);
        assert_eq!(Posting::wager(3, 8).bet_id, Some(8));
        assert_eq!(Posting::deposit().bet_id, None);
        assert_eq!(Posting::prize(3).tournament_id, Some(3));
    }
}
