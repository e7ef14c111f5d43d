//! Tournament and settlement API handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use igaming::{
    ErrorKind,
    settlement::SettlementResult,
    tournament::{NewTournament, Tournament, TournamentId, TournamentState},
    wager::Bet,
};
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use super::{AppState, error::ApiError, extract::ApiJson};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct ListTournamentsQuery {
    pub state: Option<TournamentState>,
}

/// Create a tournament.
///
/// # Errors
///
/// - `400 Bad Request`: Blank name, non-positive prize pool, or end not after start
pub async fn create_tournament(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewTournament>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    let tournament = state.tournaments.create(request).await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

/// List tournaments, optionally `?state=open` or `?state=settled`.
pub async fn list_tournaments(
    State(state): State<AppState>,
    Query(query): Query<ListTournamentsQuery>,
) -> Result<Json<Vec<Tournament>>, ApiError> {
    Ok(Json(state.tournaments.list(query.state).await?))
}

/// Get one tournament.
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> Result<Json<Tournament>, ApiError> {
    Ok(Json(state.tournaments.get(tournament_id).await?))
}

/// Settle a tournament and pay its prizes.
///
/// # Errors
///
/// - `404 Not Found`: Unknown tournament
/// - `409 Conflict`: Already settled, or no bets to settle
/// - `503 Service Unavailable`: Lock conflict, safe to retry
pub async fn settle_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> Result<Json<Vec<SettlementResult>>, ApiError> {
    match state.settlement.settle(tournament_id).await {
        Ok(results) => {
            metrics::settlements_total("settled");
            let paid: rust_decimal::Decimal = results.iter().map(|r| r.prize_amount).sum();
            metrics::prizes_paid(paid.to_f64().unwrap_or_default());
            Ok(Json(results))
        }
        Err(err) => {
            let kind = err.kind();
            metrics::settlements_total(kind.as_str());
            if kind == ErrorKind::ConcurrencyConflict {
                metrics::concurrency_conflicts_total("settle");
            }
            Err(err.into())
        }
    }
}

/// Settlement results in placement order; empty while Open.
pub async fn get_results(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> Result<Json<Vec<SettlementResult>>, ApiError> {
    Ok(Json(state.settlement.results(tournament_id).await?))
}

/// Bets on a tournament in insertion order.
pub async fn list_tournament_bets(
    State(state): State<AppState>,
    Path(tournament_id): Path<TournamentId>,
) -> Result<Json<Vec<Bet>>, ApiError> {
    Ok(Json(state.wagers.for_tournament(tournament_id).await?))
}
