//! Settlement engine: the one-time Open → Settled transition with payouts.
#![allow(clippy::needless_raw_string_hashes)]

use super::{
    errors::{EngineResult, SettlementError},
    models::{PayoutSchedule, SettlementResult},
    payout::{compute_payouts, rank_participants},
};
use crate::config::EngineConfig;
use crate::db::{LockMode, timeouts};
use crate::error::ErrorKind;
use crate::ledger::{Ledger, PlayerId, Posting};
use crate::tournament::{TournamentError, TournamentId, TournamentStore};
use crate::wager::WagerStore;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;
use std::time::Duration;

/// Settles tournaments
///
/// `settle` is the only way a tournament leaves the Open state. All of its
/// writes happen in one transaction that holds the tournament row exclusively,
/// so a concurrent second attempt waits and then observes `AlreadySettled`.
#[derive(Clone)]
pub struct SettlementEngine {
    pool: Arc<PgPool>,
    ledger: Ledger,
    tournaments: TournamentStore,
    schedule: PayoutSchedule,
    lock_timeout: Duration,
    transaction_timeout: Duration,
}

impl SettlementEngine {
    /// Create a new settlement engine using the configured payout schedule
    pub fn new(
        pool: Arc<PgPool>,
        ledger: Ledger,
        tournaments: TournamentStore,
        config: &EngineConfig,
    ) -> Self {
        Self {
            pool,
            ledger,
            tournaments,
            schedule: config.payout_schedule.clone(),
            lock_timeout: config.lock_timeout,
            transaction_timeout: config.transaction_timeout,
        }
    }

    pub fn schedule(&self) -> &PayoutSchedule {
        &self.schedule
    }

    /// Settle a tournament
    ///
    /// Ranks every participant, credits each non-zero prize, records one result
    /// per participant and marks the tournament Settled. Any failure rolls
    /// everything back.
    ///
    /// # Returns
    ///
    /// * `EngineResult<Vec<SettlementResult>>` - Results in placement order
    ///
    /// # Errors
    ///
    /// * `TournamentError::NotFound` - Unknown tournament
    /// * `SettlementError::AlreadySettled` - Tournament already settled
    /// * `SettlementError::NoEligibleParticipants` - No bets; the tournament stays Open
    pub async fn settle(&self, tournament_id: TournamentId) -> EngineResult<Vec<SettlementResult>> {
        let outcome = self.pay_out(tournament_id).await;

        match &outcome {
            Ok(results) => {
                let paid: Decimal = results.iter().map(|r| r.prize_amount).sum();
                log::info!(
                    "Settled tournament {} with {} participants, paid {}",
                    tournament_id,
                    results.len(),
                    paid
                );
            }
            Err(e) if e.kind() == ErrorKind::ConcurrencyConflict => {
                log::warn!("Settlement of tournament {tournament_id} hit a lock conflict: {e}");
            }
            Err(_) => {}
        }

        outcome
    }

    /// Everything but COMMIT runs under the transaction timeout
    async fn pay_out(&self, tournament_id: TournamentId) -> EngineResult<Vec<SettlementResult>> {
        let (tx, results) = timeouts::within(self.transaction_timeout, async {
            let mut tx = timeouts::begin(&self.pool, self.lock_timeout).await?;

            let tournament =
                TournamentStore::lock(&mut tx, tournament_id, LockMode::Update).await?;
            if !tournament.is_open() {
                return Err(SettlementError::AlreadySettled(tournament_id));
            }

            let bets = WagerStore::bets_for_tournament(&mut tx, tournament_id).await?;
            if bets.is_empty() {
                return Err(SettlementError::NoEligibleParticipants(tournament_id));
            }

            let payouts = compute_payouts(
                tournament.prize_pool,
                &self.schedule,
                &rank_participants(&bets),
            );

            let player_ids: Vec<PlayerId> = payouts.iter().map(|p| p.player_id).collect();
            Ledger::lock_players(&mut tx, &player_ids).await?;

            let mut results = Vec::with_capacity(payouts.len());
            for payout in &payouts {
                if payout.prize_amount > Decimal::ZERO {
                    self.ledger
                        .credit(
                            &mut tx,
                            payout.player_id,
                            payout.prize_amount,
                            Posting::prize(tournament_id),
                        )
                        .await?;
                }

                let row = sqlx::query(
                    r#"
                    INSERT INTO tournament_results
                        (tournament_id, player_id, placement, total_wagered, prize_amount)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id, tournament_id, player_id, placement, total_wagered, prize_amount, created_at
                    "#,
                )
                .bind(tournament_id)
                .bind(payout.player_id)
                .bind(payout.placement)
                .bind(payout.total_wagered)
                .bind(payout.prize_amount)
                .fetch_one(&mut *tx)
                .await?;

                results.push(result_from_row(&row));
            }

            TournamentStore::transition_to_settled(&mut tx, tournament_id).await?;
            Ok((tx, results))
        })
        .await?;

        tx.commit().await?;
        Ok(results)
    }

    /// Settlement results of a tournament in placement order
    ///
    /// Empty while the tournament is Open.
    pub async fn results(&self, tournament_id: TournamentId) -> EngineResult<Vec<SettlementResult>> {
        if !self.tournaments.exists(tournament_id).await? {
            return Err(TournamentError::NotFound(tournament_id).into());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, tournament_id, player_id, placement, total_wagered, prize_amount, created_at
            FROM tournament_results
            WHERE tournament_id = $1
            ORDER BY placement
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(result_from_row).collect())
    }
}

fn result_from_row(row: &PgRow) -> SettlementResult {
    SettlementResult {
        id: row.get("id"),
        tournament_id: row.get("tournament_id"),
        player_id: row.get("player_id"),
        placement: row.get("placement"),
        total_wagered: row.get("total_wagered"),
        prize_amount: row.get("prize_amount"),
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
    }
}
