//! Bet API handlers.
//!
//! # Examples
//!
//! Place a bet:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/bets \
//!   -H "Content-Type: application/json" \
//!   -d '{"player_id": 1, "tournament_id": 1, "amount": "50.00"}'
//! ```

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use igaming::{
    ErrorKind,
    wager::{Bet, NewBet, Page, models::DEFAULT_PAGE_LIMIT},
};
use serde::Deserialize;

use super::{AppState, error::ApiError, extract::ApiJson};
use crate::metrics;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<PageQuery> for Page {
    fn from(query: PageQuery) -> Self {
        Page::new(
            query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            query.offset.unwrap_or(0),
        )
    }
}

/// Place a bet.
///
/// Returns `201 Created` with the bet.
///
/// # Errors
///
/// - `400 Bad Request`: Amount not positive or more than two decimal places
/// - `404 Not Found`: Unknown player or tournament
/// - `409 Conflict`: Tournament settled or past its end time
/// - `422 Unprocessable Entity`: Insufficient funds
/// - `503 Service Unavailable`: Lock conflict, safe to retry
pub async fn place_bet(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<NewBet>,
) -> Result<(StatusCode, Json<Bet>), ApiError> {
    match state
        .wagers
        .place_bet(request.player_id, request.tournament_id, request.amount)
        .await
    {
        Ok(bet) => {
            metrics::bets_placed_total();
            Ok((StatusCode::CREATED, Json(bet)))
        }
        Err(err) => {
            let kind = err.kind();
            metrics::bets_rejected_total(kind);
            if kind == ErrorKind::ConcurrencyConflict {
                metrics::concurrency_conflicts_total("place_bet");
            }
            Err(err.into())
        }
    }
}

/// All bets in insertion order, `?limit=&offset=`.
pub async fn list_bets(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Bet>>, ApiError> {
    Ok(Json(state.wagers.get_all(query.into()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use igaming::wager::models::MAX_PAGE_LIMIT;

    #[test]
    fn test_page_query_defaults() {
        let page: Page = PageQuery {
            limit: None,
            offset: None,
        }
        .into();
        assert_eq!(page, Page::default());

        let page: Page = PageQuery {
            limit: Some(1_000_000),
            offset: Some(-3),
        }
        .into();
        assert_eq!(page.limit, MAX_PAGE_LIMIT);
        assert_eq!(page.offset, 0);
    }
}
