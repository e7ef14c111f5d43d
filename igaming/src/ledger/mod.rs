//! Ledger module owning player balances.
//!
//! This module implements:
//! - Player registration with an optional opening deposit
//! - Atomic debit/credit under a row lock held by the caller's transaction
//! - A non-negative balance invariant, enforced in code and by the schema
//! - An append-only entry per balance mutation for auditing
//!
//! ## Example
//!
//! ```no_run
//! use igaming::{EngineConfig, db::Database, ledger::{Ledger, NewPlayer}};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let ledger = Ledger::new(Arc::new(db.pool().clone()), &EngineConfig::default());
//!
//!     let player = ledger
//!         .create_player(NewPlayer::new("bob", "bob@example.com", Decimal::ZERO))
//!         .await?;
//!     let balance = ledger.deposit(player.id, Decimal::from(250)).await?;
//!     println!("Balance after deposit: {}", balance);
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{LedgerError, LedgerResult};
pub use manager::Ledger;
pub use models::{
    EntryDirection, EntryType, LedgerEntry, NewPlayer, Player, PlayerId, Posting, UnknownVariant,
};
