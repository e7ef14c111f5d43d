//! Settlement module: ranking, payouts and the one-time settlement.
//!
//! Settling a tournament happens in a single transaction:
//! 1. Lock the tournament row exclusively and check it is Open
//! 2. Load its bets and rank participants by total wagered
//! 3. Lock the participants' balances in ascending ID order
//! 4. Credit prizes from the payout schedule and record one result per participant
//! 5. Compare-and-set the tournament to Settled and commit
//!
//! ## Example
//!
//! ```no_run
//! use igaming::settlement::{PayoutSchedule, compute_payouts, rank_participants};
//! use igaming::wager::Bet;
//! use rust_decimal::Decimal;
//!
//! let bets: Vec<Bet> = Vec::new();
//! let payouts = compute_payouts(
//!     Decimal::from(1200),
//!     &PayoutSchedule::standard(),
//!     &rank_participants(&bets),
//! );
//! for payout in payouts {
//!     println!("#{} player {} wins {}", payout.placement, payout.player_id, payout.prize_amount);
//! }
//! ```

pub mod engine;
pub mod errors;
pub mod models;
pub mod payout;

pub use engine::SettlementEngine;
pub use errors::{EngineResult, ScheduleError, SettlementError};
pub use models::{Participant, Payout, PayoutSchedule, SettlementResult};
pub use payout::{compute_payouts, rank_participants};
