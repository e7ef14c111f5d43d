//! # iGaming
//!
//! A wagering and settlement engine for player tournaments, backed by PostgreSQL.
//!
//! Players hold a decimal balance, wager it on open tournaments, and each tournament
//! settles exactly once by ranking its participants and paying prizes out of the
//! tournament's prize pool. Every balance mutation runs under a row lock inside a
//! single database transaction, so concurrent bets and concurrent settlement
//! attempts can never create, destroy, or double-spend money.
//!
//! ## Components
//!
//! - [`ledger`]: player balances with atomic debit/credit and an audit trail
//! - [`tournament`]: tournament metadata and the Open → Settled lifecycle
//! - [`wager`]: immutable bet records, placed by debiting the ledger
//! - [`settlement`]: ranking, payout computation and the one-time settlement
//! - [`ranking`]: dense-ranked leaderboard over player balances
//! - [`db`]: connection pooling, migrations and lock-bounded transactions
//!
//! ## Example
//!
//! ```no_run
//! use igaming::{
//!     EngineConfig,
//!     db::{Database, DatabaseConfig},
//!     ledger::{Ledger, NewPlayer},
//!     settlement::SettlementEngine,
//!     tournament::{NewTournament, TournamentStore},
//!     wager::WagerStore,
//! };
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()).await?;
//!     db.run_migrations().await?;
//!
//!     let pool = Arc::new(db.pool().clone());
//!     let config = EngineConfig::from_env()?;
//!     let ledger = Ledger::new(pool.clone(), &config);
//!     let tournaments = TournamentStore::new(pool.clone(), &config);
//!     let wagers = WagerStore::new(pool.clone(), ledger.clone(), tournaments.clone(), &config);
//!     let settlement = SettlementEngine::new(pool, ledger.clone(), tournaments.clone(), &config);
//!
//!     let player = ledger
//!         .create_player(NewPlayer::new("alice", "alice@example.com", Decimal::from(100)))
//!         .await?;
//!     let now = chrono::Utc::now();
//!     let tournament = tournaments
//!         .create(NewTournament::new(
//!             "Friday Cup",
//!             Decimal::from(1200),
//!             now,
//!             now + chrono::Duration::hours(2),
//!         ))
//!         .await?;
//!
//!     wagers.place_bet(player.id, tournament.id, Decimal::from(50)).await?;
//!     let results = settlement.settle(tournament.id).await?;
//!     println!("winner: {:?}", results.first());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod money;
pub mod ranking;
pub mod settlement;
pub mod tournament;
pub mod wager;

pub use config::EngineConfig;
pub use error::ErrorKind;
