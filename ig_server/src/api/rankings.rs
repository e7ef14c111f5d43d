//! Leaderboard API handler.

use axum::{Json, extract::State};
use igaming::ranking::RankingEntry;

use super::{AppState, error::ApiError};

/// Players by balance with dense ranks.
///
/// ```bash
/// curl http://localhost:8080/api/v1/rankings
/// # [{"player_id":3,"player_name":"carol","balance":"670.00","rank":1}, ...]
/// ```
pub async fn get_rankings(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankingEntry>>, ApiError> {
    Ok(Json(state.rankings.get_rankings().await?))
}
