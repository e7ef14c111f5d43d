//! Tournament module: prize-pool tournaments and their lifecycle.
//!
//! A tournament is created Open with a fixed prize pool and a scheduled
//! window. It accepts bets while Open and moves to Settled exactly once,
//! when the settlement engine pays out its prizes.
//!
//! ## Example
//!
//! ```no_run
//! use igaming::{EngineConfig, db::Database, tournament::{NewTournament, TournamentStore}};
//! use chrono::{Duration, Utc};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let store = TournamentStore::new(Arc::new(db.pool().clone()), &EngineConfig::default());
//!
//!     let start = Utc::now();
//!     let tournament = store
//!         .create(NewTournament::new(
//!             "Sunday Special",
//!             Decimal::from(1200),
//!             start,
//!             start + Duration::hours(2),
//!         ))
//!         .await?;
//!     println!("Created tournament: {}", tournament.id);
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod models;
pub mod store;

pub use errors::{TournamentError, TournamentResult};
pub use models::{NewTournament, Tournament, TournamentId, TournamentState};
pub use store::TournamentStore;
