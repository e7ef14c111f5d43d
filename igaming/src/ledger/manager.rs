//! Ledger implementation: lock-guarded player balances with an audit trail.
#![allow(clippy::needless_raw_string_hashes)]

use super::{
    errors::{LedgerError, LedgerResult},
    models::{EntryDirection, LedgerEntry, NewPlayer, Player, PlayerId, Posting},
};
use crate::config::EngineConfig;
use crate::db::{self, timeouts};
use crate::money;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use std::sync::Arc;
use std::time::Duration;

/// Owner of every player balance.
///
/// `debit` and `credit` take the caller's transaction: the balance row stays
/// locked until that transaction commits or rolls back, so concurrent mutations
/// of one player serialize in lock-acquisition order.
#[derive(Clone)]
pub struct Ledger {
    pool: Arc<PgPool>,
    lock_timeout: Duration,
    transaction_timeout: Duration,
}

impl Ledger {
    /// Create a new ledger
    pub fn new(pool: Arc<PgPool>, config: &EngineConfig) -> Self {
        Self {
            pool,
            lock_timeout: config.lock_timeout,
            transaction_timeout: config.transaction_timeout,
        }
    }

    /// Register a player
    ///
    /// A positive `initial_balance` is booked as a deposit in the same transaction.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidPlayer` - Empty name or email
    /// * `LedgerError::InvalidAmount` - Negative, over-precise or too large opening balance
    /// * `LedgerError::DuplicateEmail` - Email already registered
    pub async fn create_player(&self, new_player: NewPlayer) -> LedgerResult<Player> {
        let name = new_player.name.trim();
        let email = new_player.email.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidPlayer("name is required".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(LedgerError::InvalidPlayer(format!("invalid email: {email:?}")));
        }
        let initial_balance = new_player.initial_balance;
        if initial_balance < Decimal::ZERO
            || initial_balance > money::MAX_AMOUNT
            || !money::has_money_scale(initial_balance)
        {
            return Err(LedgerError::InvalidAmount(initial_balance));
        }

        let (tx, player) = timeouts::within(self.transaction_timeout, async {
            let mut tx = timeouts::begin(&self.pool, self.lock_timeout).await?;

            let inserted = sqlx::query(
                r#"
                INSERT INTO players (name, email, balance)
                VALUES ($1, $2, 0)
                RETURNING id
                "#,
            )
            .bind(name)
            .bind(email)
            .fetch_one(&mut *tx)
            .await;

            let player_id: PlayerId = match inserted {
                Ok(row) => row.get("id"),
                Err(e) if db::is_unique_violation(&e) => {
                    return Err(LedgerError::DuplicateEmail(email.to_string()));
                }
                Err(e) => return Err(e.into()),
            };

            if initial_balance > Decimal::ZERO {
                self.credit(&mut tx, player_id, initial_balance, Posting::deposit())
                    .await?;
            }

            let player = Self::fetch_player(&mut tx, player_id).await?;
            Ok((tx, player))
        })
        .await?;

        tx.commit().await?;
        log::info!("Registered player {} with balance {}", player.id, player.balance);
        Ok(player)
    }

    /// Get a player by ID
    pub async fn get_player(&self, player_id: PlayerId) -> LedgerResult<Player> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, balance, created_at, updated_at
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(player_id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(LedgerError::PlayerNotFound(player_id))?;

        Ok(player_from_row(&row))
    }

    /// List all players in registration order
    pub async fn list_players(&self) -> LedgerResult<Vec<Player>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, balance, created_at, updated_at
            FROM players
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(player_from_row).collect())
    }

    /// List all players by balance, highest first, ties by ID
    pub async fn players_by_balance(&self) -> LedgerResult<Vec<Player>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, balance, created_at, updated_at
            FROM players
            ORDER BY balance DESC, id ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.iter().map(player_from_row).collect())
    }

    /// Current balance of a player
    pub async fn balance(&self, player_id: PlayerId) -> LedgerResult<Decimal> {
        let row = sqlx::query("SELECT balance FROM players WHERE id = $1")
            .bind(player_id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or(LedgerError::PlayerNotFound(player_id))?;

        Ok(row.get("balance"))
    }

    /// Deposit funds into a player's balance in a transaction of its own
    ///
    /// # Returns
    ///
    /// * `LedgerResult<Decimal>` - New balance
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` - Amount not positive, over-precise or too large
    /// * `LedgerError::PlayerNotFound` - Unknown player
    /// * `LedgerError::BalanceOverflow` - Balance would exceed [`money::MAX_AMOUNT`]
    pub async fn deposit(&self, player_id: PlayerId, amount: Decimal) -> LedgerResult<Decimal> {
        if !money::is_valid_amount(amount) {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let (tx, new_balance) = timeouts::within(self.transaction_timeout, async {
            let mut tx = timeouts::begin(&self.pool, self.lock_timeout).await?;
            let new_balance = self
                .credit(&mut tx, player_id, amount, Posting::deposit())
                .await?;
            Ok::<_, LedgerError>((tx, new_balance))
        })
        .await?;

        tx.commit().await?;
        log::info!("Deposited {amount} for player {player_id}, balance {new_balance}");
        Ok(new_balance)
    }

    /// Debit a player's balance inside the caller's transaction
    ///
    /// Fails without effect if `amount` exceeds the locked balance.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not strictly positive. Callers validate amounts
    /// before opening the transaction.
    ///
    /// # Errors
    ///
    /// * `LedgerError::PlayerNotFound` - Unknown player
    /// * `LedgerError::InsufficientFunds` - Balance lower than `amount`
    pub async fn debit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        player_id: PlayerId,
        amount: Decimal,
        posting: Posting,
    ) -> LedgerResult<Decimal> {
        assert!(amount > Decimal::ZERO, "debit amount must be positive, got {amount}");

        let current_balance = Self::lock_player(tx, player_id).await?;
        if current_balance < amount {
            return Err(LedgerError::InsufficientFunds {
                player_id,
                available: current_balance,
                required: amount,
            });
        }

        let new_balance = current_balance - amount;
        self.write_balance(tx, player_id, new_balance).await?;
        self.create_entry(
            tx,
            player_id,
            -amount,
            new_balance,
            EntryDirection::Debit,
            posting,
        )
        .await?;

        Ok(new_balance)
    }

    /// Credit a player's balance inside the caller's transaction
    ///
    /// # Panics
    ///
    /// Panics if `amount` is negative.
    ///
    /// # Errors
    ///
    /// * `LedgerError::PlayerNotFound` - Unknown player
    /// * `LedgerError::BalanceOverflow` - Resulting balance above [`money::MAX_AMOUNT`]
    pub async fn credit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        player_id: PlayerId,
        amount: Decimal,
        posting: Posting,
    ) -> LedgerResult<Decimal> {
        assert!(amount >= Decimal::ZERO, "credit amount must be non-negative, got {amount}");

        let current_balance = Self::lock_player(tx, player_id).await?;
        let new_balance = current_balance
            .checked_add(amount)
            .filter(|balance| *balance <= money::MAX_AMOUNT)
            .ok_or(LedgerError::BalanceOverflow(player_id))?;

        self.write_balance(tx, player_id, new_balance).await?;
        self.create_entry(
            tx,
            player_id,
            amount,
            new_balance,
            EntryDirection::Credit,
            posting,
        )
        .await?;

        Ok(new_balance)
    }

    /// Lock one player's balance row for the rest of the transaction
    ///
    /// # Returns
    ///
    /// * `LedgerResult<Decimal>` - Balance as of the lock
    pub async fn lock_player(
        tx: &mut Transaction<'_, Postgres>,
        player_id: PlayerId,
    ) -> LedgerResult<Decimal> {
        let row = sqlx::query("SELECT balance FROM players WHERE id = $1 FOR UPDATE")
            .bind(player_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(LedgerError::PlayerNotFound(player_id))?;

        Ok(row.get("balance"))
    }

    /// Lock several balance rows in ascending ID order
    ///
    /// Every multi-row locker goes through here so that all transactions acquire
    /// player locks in the same global order.
    pub async fn lock_players(
        tx: &mut Transaction<'_, Postgres>,
        player_ids: &[PlayerId],
    ) -> LedgerResult<()> {
        let mut ids = player_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let rows = sqlx::query("SELECT id FROM players WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(&ids)
            .fetch_all(&mut **tx)
            .await?;

        if rows.len() != ids.len() {
            let found: Vec<PlayerId> = rows.iter().map(|r| r.get("id")).collect();
            if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
                return Err(LedgerError::PlayerNotFound(*missing));
            }
        }

        Ok(())
    }

    /// Get ledger entries for a player, newest first
    pub async fn entries(&self, player_id: PlayerId, limit: i64) -> LedgerResult<Vec<LedgerEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, player_id, amount, balance_after, direction, entry_type, tournament_id, bet_id,
                   created_at
            FROM ledger_entries
            WHERE player_id = $1
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(player_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn write_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        player_id: PlayerId,
        new_balance: Decimal,
    ) -> LedgerResult<()> {
        sqlx::query("UPDATE players SET balance = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_balance)
            .bind(player_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Append an audit entry for a balance mutation
    async fn create_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        player_id: PlayerId,
        amount: Decimal,
        balance_after: Decimal,
        direction: EntryDirection,
        posting: Posting,
    ) -> LedgerResult<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO ledger_entries
                (player_id, amount, balance_after, direction, entry_type, tournament_id, bet_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(player_id)
        .bind(amount)
        .bind(balance_after)
        .bind(direction.as_str())
        .bind(posting.entry_type.as_str())
        .bind(posting.tournament_id)
        .bind(posting.bet_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(row.get("id"))
    }

    async fn fetch_player(
        tx: &mut Transaction<'_, Postgres>,
        player_id: PlayerId,
    ) -> LedgerResult<Player> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, balance, created_at, updated_at
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(player_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(LedgerError::PlayerNotFound(player_id))?;

        Ok(player_from_row(&row))
    }
}

fn player_from_row(row: &PgRow) -> Player {
    Player {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        balance: row.get("balance"),
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
        updated_at: row.get::<chrono::NaiveDateTime, _>("updated_at").and_utc(),
    }
}

fn entry_from_row(row: &PgRow) -> LedgerResult<LedgerEntry> {
    let direction = row
        .get::<String, _>("direction")
        .parse()
        .map_err(|e| db::column_decode_error("direction", e))?;
    let entry_type = row
        .get::<String, _>("entry_type")
        .parse()
        .map_err(|e| db::column_decode_error("entry_type", e))?;

    Ok(LedgerEntry {
        id: row.get("id"),
        player_id: row.get("player_id"),
        amount: row.get("amount"),
        balance_after: row.get("balance_after"),
        direction,
        entry_type,
        tournament_id: row.get("tournament_id"),
        bet_id: row.get("bet_id"),
        created_at: row.get::<chrono::NaiveDateTime, _>("created_at").and_utc(),
    })
}
