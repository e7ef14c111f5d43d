//! Settlement data models and the payout schedule.

use super::errors::ScheduleError;
use crate::ledger::PlayerId;
use crate::tournament::TournamentId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Final placement and prize of one participant, written once at settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub id: i64,
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    /// 1-based
    pub placement: i32,
    pub total_wagered: Decimal,
    pub prize_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A player's aggregated wagering in one tournament
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub player_id: PlayerId,
    pub total_wagered: Decimal,
    pub first_bet_at: DateTime<Utc>,
}

/// Computed placement and prize, before it is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub player_id: PlayerId,
    pub placement: i32,
    pub total_wagered: Decimal,
    pub prize_amount: Decimal,
}

/// Fractions of the prize pool paid to placements 1..=K
///
/// Placements beyond K receive nothing. A valid schedule is non-empty, every
/// fraction lies in `[0, 1]` and the fractions sum to at most 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Decimal>", into = "Vec<Decimal>")]
pub struct PayoutSchedule {
    fractions: Vec<Decimal>,
}

impl PayoutSchedule {
    /// Build a validated schedule
    ///
    /// # Errors
    ///
    /// * `ScheduleError::Empty` - No fractions
    /// * `ScheduleError::InvalidFraction` - A fraction outside `[0, 1]`
    /// * `ScheduleError::ExceedsPool` - Fractions sum above 1
    pub fn new(fractions: Vec<Decimal>) -> Result<Self, ScheduleError> {
        if fractions.is_empty() {
            return Err(ScheduleError::Empty);
        }

        if let Some(bad) = fractions
            .iter()
            .find(|f| **f < Decimal::ZERO || **f > Decimal::ONE)
        {
            return Err(ScheduleError::InvalidFraction(*bad));
        }

        let total: Decimal = fractions.iter().sum();
        if total > Decimal::ONE {
            return Err(ScheduleError::ExceedsPool(total));
        }

        Ok(Self { fractions })
    }

    /// 50% / 30% / 20% to the top three
    pub fn standard() -> Self {
        Self {
            fractions: vec![Decimal::new(5, 1), Decimal::new(3, 1), Decimal::new(2, 1)],
        }
    }

    /// Winner takes the whole pool
    pub fn winner_takes_all() -> Self {
        Self {
            fractions: vec![Decimal::ONE],
        }
    }

    /// Pool fraction for a 1-based placement, zero beyond the schedule
    pub fn fraction_for(&self, placement: usize) -> Decimal {
        placement
            .checked_sub(1)
            .and_then(|i| self.fractions.get(i))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn fractions(&self) -> &[Decimal] {
        &self.fractions
    }

    /// Number of paid placements
    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }
}

impl Default for PayoutSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Decimal>> for PayoutSchedule {
    type Error = ScheduleError;

    fn try_from(fractions: Vec<Decimal>) -> Result<Self, Self::Error> {
        Self::new(fractions)
    }
}

impl From<PayoutSchedule> for Vec<Decimal> {
    fn from(schedule: PayoutSchedule) -> Self {
        schedule.fractions
    }
}

/// Parses comma-separated fractions, e.g. `0.5,0.3,0.2`
impl FromStr for PayoutSchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fractions = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                Decimal::from_str(part).map_err(|_| ScheduleError::Unparsable(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(fractions)
    }
}
