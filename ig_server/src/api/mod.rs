//! HTTP API for the wagering server.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework for HTTP
//! - **Tower**: Middleware for CORS and request IDs
//! - **igaming**: Ledger, tournament store, wager store, settlement engine and
//!   ranking view, all sharing one PostgreSQL pool
//!
//! # Modules
//!
//! - [`players`]: Player registration, deposits and ledger entries
//! - [`tournaments`]: Tournament lifecycle, settlement and results
//! - [`bets`]: Bet placement and listing
//! - [`rankings`]: Leaderboard
//! - [`error`]: Engine error kinds mapped to HTTP statuses
//! - [`extract`]: JSON body extractor with API error rejections
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use ig_server::api::{AppState, create_router};
//! use igaming::{EngineConfig, db::{Database, DatabaseConfig}};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(&DatabaseConfig::from_env()).await?;
//! let state = AppState::new(Arc::new(db.pool().clone()), &EngineConfig::default());
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod bets;
pub mod error;
pub mod extract;
pub mod players;
pub mod rankings;
pub mod request_id;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use igaming::{
    EngineConfig,
    ledger::Ledger,
    ranking::RankingView,
    settlement::SettlementEngine,
    tournament::TournamentStore,
    wager::WagerStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every component shares the same pool.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
    pub tournaments: TournamentStore,
    pub wagers: WagerStore,
    pub settlement: SettlementEngine,
    pub rankings: RankingView,
    pub pool: Arc<PgPool>,
    /// Renders `/metrics`; `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire every engine component onto one pool
    pub fn new(pool: Arc<PgPool>, config: &EngineConfig) -> Self {
        let ledger = Ledger::new(pool.clone(), config);
        let tournaments = TournamentStore::new(pool.clone(), config);
        let wagers = WagerStore::new(pool.clone(), ledger.clone(), tournaments.clone(), config);
        let settlement =
            SettlementEngine::new(pool.clone(), ledger.clone(), tournaments.clone(), config);
        let rankings = RankingView::new(ledger.clone());

        Self {
            ledger,
            tournaments,
            wagers,
            settlement,
            rankings,
            pool,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Endpoint Summary
///
/// ```text
/// GET  /health                             - Health check
/// GET  /metrics                            - Prometheus metrics
/// POST /api/v1/players                     - Register player
/// GET  /api/v1/players                     - List players
/// GET  /api/v1/players/{id}                - Get player
/// POST /api/v1/players/{id}/deposit        - Deposit funds
/// GET  /api/v1/players/{id}/entries        - Ledger entries
/// POST /api/v1/tournaments                 - Create tournament
/// GET  /api/v1/tournaments                 - List tournaments (?state=open|settled)
/// GET  /api/v1/tournaments/{id}            - Get tournament
/// POST /api/v1/tournaments/{id}/settle     - Settle tournament
/// GET  /api/v1/tournaments/{id}/results    - Settlement results
/// GET  /api/v1/tournaments/{id}/bets       - Bets on a tournament
/// POST /api/v1/bets                        - Place bet
/// GET  /api/v1/bets                        - List bets (?limit=&offset=)
/// GET  /api/v1/rankings                    - Leaderboard
/// ```
pub fn create_router(state: AppState) -> Router {
    let root_routes = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(render_metrics));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", create_v1_router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id::request_id_middleware))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/players",
            post(players::create_player).get(players::list_players),
        )
        .route("/players/{player_id}", get(players::get_player))
        .route("/players/{player_id}/deposit", post(players::deposit))
        .route("/players/{player_id}/entries", get(players::list_entries))
        .route(
            "/tournaments",
            post(tournaments::create_tournament).get(tournaments::list_tournaments),
        )
        .route("/tournaments/{tournament_id}", get(tournaments::get_tournament))
        .route(
            "/tournaments/{tournament_id}/settle",
            post(tournaments::settle_tournament),
        )
        .route(
            "/tournaments/{tournament_id}/results",
            get(tournaments::get_results),
        )
        .route(
            "/tournaments/{tournament_id}/bets",
            get(tournaments::list_tournament_bets),
        )
        .route("/bets", post(bets::place_bet).get(bets::list_bets))
        .route("/rankings", get(rankings::get_rankings))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the database answers, `503 Service Unavailable` otherwise.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","database":true,"timestamp":"2026-10-16T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = sqlx::query("SELECT 1")
        .fetch_one(state.pool.as_ref())
        .await
        .is_ok();

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if db_healthy { "healthy" } else { "unhealthy" },
            "database": db_healthy,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// Prometheus text exposition, `404 Not Found` when metrics are disabled
async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
