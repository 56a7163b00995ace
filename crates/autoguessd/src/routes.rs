//! API routes for autoguessd

use autoguess_common::protocol::{GUESS_PATH, HEALTH_PATH, START_ROUND_PATH};
use autoguess_common::{
    ErrorResponse, GameError, GuessRequest, GuessResponse, HealthResponse, StartRoundRequest,
    StartRoundResponse, VERSION,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::server::AppState;

type AppStateArc = Arc<AppState>;

/// Boundary error: a [`GameError`] rendered as status code plus JSON body.
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_client_error() {
            warn!("  Rejected request: {}", self.0);
        } else {
            error!("  Request failed: {}", self.0);
        }

        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Game Routes
// ============================================================================

pub fn start_routes() -> Router<AppStateArc> {
    Router::new().route(START_ROUND_PATH, post(start_round))
}

/// Guess handling can wait on the round lock, so it is kept apart from the
/// routes that get a request timeout.
pub fn guess_routes() -> Router<AppStateArc> {
    Router::new().route(GUESS_PATH, post(submit_guess))
}

async fn start_round(
    State(state): State<AppStateArc>,
    Json(req): Json<StartRoundRequest>,
) -> Result<Json<StartRoundResponse>, ApiError> {
    info!("  Starting round for prefix {:?}", req.search_term_prefix);

    let response = state
        .engine
        .start(&req.search_term_prefix, req.maximum_strikes)
        .await?;

    Ok(Json(response))
}

async fn submit_guess(
    State(state): State<AppStateArc>,
    Json(req): Json<GuessRequest>,
) -> Result<Json<GuessResponse>, ApiError> {
    let response = state
        .engine
        .guess(&req.round_identifier, &req.guess_text)
        .await?;

    Ok(Json(response))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route(HEALTH_PATH, get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        active_rounds: state.engine.store().active_len().await,
    })
}
