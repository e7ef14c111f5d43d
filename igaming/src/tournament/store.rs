//! Tournament store: metadata and the Open → Settled lifecycle.

use super::{
    errors::{TournamentError, TournamentResult},
    models::{NewTournament, Tournament, TournamentId, TournamentState},
};
use crate::config::EngineConfig;
use crate::db::{self, LockMode, timeouts};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use std::sync::Arc;
use std::time::Duration;

const TOURNAMENT_COLUMNS: &str = "id, name, prize_pool, start_time, end_time, state, \
                                  created_at, updated_at, settled_at";

/// Tournament store
#[derive(Clone)]
pub struct TournamentStore {
    pool: Arc<PgPool>,
    lock_timeout: Duration,
    transaction_timeout: Duration,
}

impl TournamentStore {
    /// Create a new tournament store
    pub fn new(pool: Arc<PgPool>, config: &EngineConfig) -> Self {
        Self {
            pool,
            lock_timeout: config.lock_timeout,
            transaction_timeout: config.transaction_timeout,
        }
    }

    /// Create a new tournament in the Open state
    ///
    /// # Errors
    ///
    /// * `TournamentError::InvalidPrizePool` - Pool not positive
    /// * `TournamentError::InvalidSchedule` - End not after start
    /// * `TournamentError::InvalidName` - Blank name
    pub async fn create(&self, request: NewTournament) -> TournamentResult<Tournament> {
        request.validate()?;

        let (tx, row) = timeouts::within(self.transaction_timeout, async {
            let mut tx = timeouts::begin(&self.pool, self.lock_timeout).await?;
            let row = sqlx::query(&format!(
                "INSERT INTO tournaments (name, prize_pool, start_time, end_time, state)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {TOURNAMENT_COLUMNS}"
            ))
            .bind(request.name.trim())
            .bind(request.prize_pool)
            .bind(request.start_time.naive_utc())
            .bind(request.end_time.naive_utc())
            .bind(TournamentState::Open.as_str())
            .fetch_one(&mut *tx)
            .await?;
            Ok::<_, TournamentError>((tx, row))
        })
        .await?;
        tx.commit().await?;

        let tournament = tournament_from_row(&row)?;
        log::info!(
            "Created tournament {} '{}' with prize pool {}",
            tournament.id,
            tournament.name,
            tournament.prize_pool
        );
        Ok(tournament)
    }

    /// Check whether a tournament exists
    pub async fn exists(&self, tournament_id: TournamentId) -> TournamentResult<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM tournaments WHERE id = $1) AS present")
            .bind(tournament_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.get("present"))
    }

    /// Get a tournament by ID
    pub async fn get(&self, tournament_id: TournamentId) -> TournamentResult<Tournament> {
        let row = sqlx::query(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = $1"
        ))
        .bind(tournament_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(TournamentError::NotFound(tournament_id))?;

        tournament_from_row(&row)
    }

    /// List tournaments, newest first, optionally filtered by state
    pub async fn list(
        &self,
        state_filter: Option<TournamentState>,
    ) -> TournamentResult<Vec<Tournament>> {
        let rows = match state_filter {
            Some(state) => {
                sqlx::query(&format!(
                    "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE state = $1 ORDER BY id DESC"
                ))
                .bind(state.as_str())
                .fetch_all(self.pool.as_ref())
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY id DESC"
                ))
                .fetch_all(self.pool.as_ref())
                .await?
            }
        };

        rows.iter().map(tournament_from_row).collect()
    }

    /// Lock a tournament row for the rest of the caller's transaction
    ///
    /// Bet placement takes a share lock so bets on one tournament proceed in
    /// parallel; settlement takes the exclusive lock and so waits for in-flight
    /// bets and blocks new ones until it commits.
    pub async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        tournament_id: TournamentId,
        mode: LockMode,
    ) -> TournamentResult<Tournament> {
        let row = sqlx::query(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = $1 {}",
            mode.as_sql()
        ))
        .bind(tournament_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(TournamentError::NotFound(tournament_id))?;

        tournament_from_row(&row)
    }

    /// Compare-and-set Open → Settled inside the caller's transaction
    ///
    /// This is the single source of truth for "has this tournament been settled".
    ///
    /// # Errors
    ///
    /// * `TournamentError::AlreadySettled` - State was not Open
    /// * `TournamentError::NotFound` - No such tournament
    pub async fn transition_to_settled(
        tx: &mut Transaction<'_, Postgres>,
        tournament_id: TournamentId,
    ) -> TournamentResult<()> {
        let result = sqlx::query(
            "UPDATE tournaments
             SET state = $1, settled_at = NOW(), updated_at = NOW()
             WHERE id = $2 AND state = $3",
        )
        .bind(TournamentState::Settled.as_str())
        .bind(tournament_id)
        .bind(TournamentState::Open.as_str())
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let present = sqlx::query("SELECT 1 FROM tournaments WHERE id = $1")
            .bind(tournament_id)
            .fetch_optional(&mut **tx)
            .await?;

        match present {
            Some(_) => Err(TournamentError::AlreadySettled(tournament_id)),
            None => Err(TournamentError::NotFound(tournament_id)),
        }
    }
}

fn tournament_from_row(row: &PgRow) -> TournamentResult<Tournament> {
    let state = row
        .get::<String, _>("state")
        .parse()
        .map_err(|e| db::column_decode_error("state", e))?;

    Ok(Tournament {
        id: row.get("id"),
        name: row.get("name"),
        prize_pool: row.get("prize_pool"),
        start_time: row.get::<chrono::NaiveDateTime, _>("start_time").and_utc(),
        end_time: row.get::<chrono::NaiveDateTime, _>("end_time").and_utc(),
        state,
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
        settled_at: row
            .get::<Option<chrono::NaiveDateTime>, _>("settled_at")
            .map(|dt| dt.and_utc()),
    })
}
