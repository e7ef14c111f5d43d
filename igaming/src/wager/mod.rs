//! Wager module: immutable bets backed by a ledger debit.
//!
//! Placing a bet locks the tournament (shared) and the player's balance
//! (exclusive) in that order, debits the stake and inserts the bet in a single
//! transaction. Settlement takes the same tournament lock exclusively, so no bet
//! can slip in once a settlement has started.

pub mod errors;
pub mod models;
pub mod store;

pub use errors::{NotOpenReason, WagerError, WagerResult};
pub use models::{Bet, BetId, NewBet, Page};
pub use store::{WagerStore, ensure_accepting_bets};
