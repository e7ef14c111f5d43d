//! Player and ledger API handlers.
//!
//! # Examples
//!
//! Register a player with an opening deposit:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/players \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "alice", "email": "alice@example.com", "initial_balance": "100.00"}'
//! ```

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use igaming::ledger::{LedgerEntry, NewPlayer, Player, PlayerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AppState, error::ApiError, extract::ApiJson};

/// Default number of ledger entries returned
const DEFAULT_ENTRY_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub player_id: PlayerId,
    pub balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub limit: Option<i64>,
}

/// Register a player.
///
/// Returns `201 Created` with the player. A duplicate email is `409 Conflict`.
pub async fn create_player(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewPlayer>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = state.ledger.create_player(request).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// List all players in registration order.
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>, ApiError> {
    Ok(Json(state.ledger.list_players().await?))
}

/// Get one player.
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<Player>, ApiError> {
    Ok(Json(state.ledger.get_player(player_id).await?))
}

/// Deposit funds.
///
/// # Errors
///
/// - `400 Bad Request`: Amount not positive or more than two decimal places
/// - `404 Not Found`: Unknown player
pub async fn deposit(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
    ApiJson(request): ApiJson<DepositRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.ledger.deposit(player_id, request.amount).await?;
    Ok(Json(BalanceResponse { player_id, balance }))
}

/// Ledger entries of a player, newest first.
pub async fn list_entries(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_ENTRY_LIMIT).clamp(1, 1000);
    state.ledger.get_player(player_id).await?;
    Ok(Json(state.ledger.entries(player_id, limit).await?))
}
