//! Wager data models.

use crate::ledger::PlayerId;
use crate::tournament::TournamentId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bet ID type
pub type BetId = i64;

/// Default number of bets per page
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// A placed bet. Its existence implies the stake was debited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: BetId,
    pub player_id: PlayerId,
    pub tournament_id: TournamentId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Bet placement request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBet {
    pub player_id: PlayerId,
    pub tournament_id: TournamentId,
    pub amount: Decimal,
}

/// Window over bets in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Build a page, clamping `limit` to `1..=MAX_PAGE_LIMIT` and `offset` to `>= 0`
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            offset: offset.max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}
