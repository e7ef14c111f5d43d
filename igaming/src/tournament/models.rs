//! Tournament data models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::TournamentError;
use crate::ledger::UnknownVariant;
use crate::money;

/// Tournament ID type
pub type TournamentId = i64;

/// Tournament lifecycle state
///
/// The only transition is Open → Settled, performed once by settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentState {
    /// Accepting bets
    Open,
    /// Prizes paid, results recorded
    Settled,
}

impl TournamentState {
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentState::Open => "open",
            TournamentState::Settled => "settled",
        }
    }
}

impl fmt::Display for TournamentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TournamentState {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TournamentState::Open),
            "settled" => Ok(TournamentState::Settled),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Tournament model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub prize_pool: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub state: TournamentState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl Tournament {
    pub fn is_open(&self) -> bool {
        self.state == TournamentState::Open
    }

    /// Whether the scheduled end has passed at `now`
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }
}

/// Tournament creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub prize_pool: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl NewTournament {
    pub fn new(
        name: impl Into<String>,
        prize_pool: Decimal,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            prize_pool,
            start_time,
            end_time,
        }
    }

    /// Check the request before it reaches storage
    ///
    /// # Errors
    ///
    /// * `TournamentError::InvalidName` - Blank name
    /// * `TournamentError::InvalidPrizePool` - Pool not positive, over-precise or above the storable maximum
    /// * `TournamentError::InvalidSchedule` - End not after start
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.name.trim().is_empty() {
            return Err(TournamentError::InvalidName);
        }

        if !money::is_valid_amount(self.prize_pool) {
            return Err(TournamentError::InvalidPrizePool(self.prize_pool));
        }

        if self.end_time <= self.start_time {
            return Err(TournamentError::InvalidSchedule {
                start_time: self.start_time,
                end_time: self.end_time,
            });
        }

        Ok(())
    }
}
