//! Wager store: debits the ledger and records the bet in one transaction.
#![allow(clippy::needless_raw_string_hashes)]

use super::{
    errors::{NotOpenReason, WagerError, WagerResult},
    models::{Bet, Page},
};
use crate::config::EngineConfig;
use crate::db::{LockMode, timeouts};
use crate::error::ErrorKind;
use crate::ledger::{Ledger, PlayerId, Posting};
use crate::money;
use crate::tournament::{Tournament, TournamentError, TournamentId, TournamentStore};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use std::sync::Arc;
use std::time::Duration;

/// Bet placement and bet queries
#[derive(Clone)]
pub struct WagerStore {
    pool: Arc<PgPool>,
    ledger: Ledger,
    tournaments: TournamentStore,
    lock_timeout: Duration,
    transaction_timeout: Duration,
    allow_bets_after_end: bool,
}

impl WagerStore {
    /// Create a new wager store
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
            lock_timeout: config.lock_timeout,
            transaction_timeout: config.transaction_timeout,
            allow_bets_after_end: config.allow_bets_after_end,
        }
    }

    /// Place a bet
    ///
    /// Locks the tournament row (shared) and then the player's balance row
    /// (exclusive), records the bet and debits the stake against it. Nothing is
    /// written unless every step succeeds.
    ///
    /// Only the work before COMMIT is bounded by the transaction timeout, so a
    /// `ConcurrencyConflict` always means nothing was written.
    ///
    /// # Arguments
    ///
    /// * `player_id` - Player placing the bet
    /// * `tournament_id` - Tournament wagered on
    /// * `amount` - Stake, positive with at most two decimal places
    ///
    /// # Returns
    ///
    /// * `WagerResult<Bet>` - The recorded bet
    ///
    /// # Errors
    ///
    /// * `WagerError::InvalidAmount` - Stake not positive, over-precise or too large
    /// * `TournamentError::NotFound` - Unknown tournament
    /// * `WagerError::TournamentNotOpen` - Tournament settled or past its end
    /// * `LedgerError::PlayerNotFound` - Unknown player
    /// * `LedgerError::InsufficientFunds` - Stake exceeds the balance
    pub async fn place_bet(
        &self,
        player_id: PlayerId,
        tournament_id: TournamentId,
        amount: Decimal,
    ) -> WagerResult<Bet> {
        if !money::is_valid_amount(amount) {
            return Err(WagerError::InvalidAmount(amount));
        }

        let result = self.record_bet(player_id, tournament_id, amount).await;

        match &result {
            Ok(bet) => log::info!(
                "Player {} bet {} on tournament {} (bet {})",
                bet.player_id,
                bet.amount,
                bet.tournament_id,
                bet.id
            ),
            Err(e) if e.kind() == ErrorKind::ConcurrencyConflict => log::warn!(
                "Bet by player {player_id} on tournament {tournament_id} hit a lock conflict: {e}"
            ),
            Err(_) => {}
        }

        result
    }

    async fn record_bet(
        &self,
        player_id: PlayerId,
        tournament_id: TournamentId,
        amount: Decimal,
    ) -> WagerResult<Bet> {
        let (tx, bet) = timeouts::within(self.transaction_timeout, async {
            let mut tx = timeouts::begin(&self.pool, self.lock_timeout).await?;

            let tournament = TournamentStore::lock(&mut tx, tournament_id, LockMode::Share).await?;
            ensure_accepting_bets(&tournament, Utc::now(), self.allow_bets_after_end)?;

            // Hold the balance row before the bet insert takes its foreign-key lock on it
            Ledger::lock_player(&mut tx, player_id).await?;

            let row = sqlx::query(
                r#"
                INSERT INTO tournament_bets (player_id, tournament_id, amount)
                VALUES ($1, $2, $3)
                RETURNING id, player_id, tournament_id, amount, created_at
                "#,
            )
            .bind(player_id)
            .bind(tournament_id)
            .bind(amount)
            .fetch_one(&mut *tx)
            .await?;
            let bet = bet_from_row(&row);

            self.ledger
                .debit(&mut tx, player_id, amount, Posting::wager(tournament_id, bet.id))
                .await?;

            Ok::<_, WagerError>((tx, bet))
        })
        .await?;

        tx.commit().await?;
        Ok(bet)
    }

    /// All bets in insertion order, one page at a time
    pub async fn get_all(&self, page: Page) -> WagerResult<Vec<Bet>> {
        let rows = sqlx::query(
            r#"
            SELECT id, player_id, tournament_id, amount, created_at
            FROM tournament_bets
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(bet_from_row).collect())
    }

    /// Bets on one tournament in insertion order
    ///
    /// # Errors
    ///
    /// * `TournamentError::NotFound` - Unknown tournament
    pub async fn for_tournament(&self, tournament_id: TournamentId) -> WagerResult<Vec<Bet>> {
        if !self.tournaments.exists(tournament_id).await? {
            return Err(TournamentError::NotFound(tournament_id).into());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, player_id, tournament_id, amount, created_at
            FROM tournament_bets
            WHERE tournament_id = $1
            ORDER BY id
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(bet_from_row).collect())
    }

    /// Bets on one tournament, read inside the caller's transaction
    pub async fn bets_for_tournament(
        tx: &mut Transaction<'_, Postgres>,
        tournament_id: TournamentId,
    ) -> WagerResult<Vec<Bet>> {
        let rows = sqlx::query(
            r#"
            SELECT id, player_id, tournament_id, amount, created_at
            FROM tournament_bets
            WHERE tournament_id = $1
            ORDER BY id
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows.iter().map(bet_from_row).collect())
    }
}

/// Check the betting window of a locked tournament
///
/// Bets are accepted while the tournament is Open and, unless
/// `allow_after_end` is set, before its end time. Bets ahead of the start time
/// are accepted.
pub fn ensure_accepting_bets(
    tournament: &Tournament,
    now: DateTime<Utc>,
    allow_after_end: bool,
) -> WagerResult<()> {
    let reason = if !tournament.is_open() {
        Some(NotOpenReason::Settled)
    } else if !allow_after_end && tournament.has_ended(now) {
        Some(NotOpenReason::Ended)
    } else {
        None
    };

    match reason {
        Some(reason) => Err(WagerError::TournamentNotOpen {
            tournament_id: tournament.id,
            reason,
        }),
        None => Ok(()),
    }
}

fn bet_from_row(row: &PgRow) -> Bet {
    Bet {
        id: row.get("id"),
        player_id: row.get("player_id"),
        tournament_id: row.get("tournament_id"),
        amount: row.get("amount"),
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
    }
}
