// =============================================================================
// REST API Endpoints: Axum 0.7
// =============================================================================
//
//   GET  /health   liveness check
//   POST /signals  candles in, snapshot out
//
// CORS is permissive unless `permissive_cors` is switched off in the config.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::app_state::AppState;
use crate::market_data::CandleInput;
use crate::signals::Snapshot;

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST router with tracing / CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/signals", post(signals))
        .layer(TraceLayer::new_for_http());

    if state.config.permissive_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router.with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Signals
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SignalsRequest {
    /// Free-form label echoed back; the configured default applies when
    /// absent or null.
    #[serde(default)]
    pub timeframe: Option<String>,
    pub candles: Vec<CandleInput>,
}

async fn signals(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignalsRequest>, JsonRejection>,
) -> Result<Json<Snapshot>, ApiError> {
    let request_id = Uuid::new_v4();

    let Json(request) = payload.map_err(|rejection| {
        warn!(%request_id, error = %rejection.body_text(), "unreadable signals request");
        ApiError::from(rejection)
    })?;

    let max = state.config.max_candles;
    if request.candles.len() > max {
        warn!(%request_id, candles = request.candles.len(), max, "signals request too large");
        return Err(ApiError::BadRequest(format!(
            "too many candles: {} > {max}",
            request.candles.len()
        )));
    }

    let timeframe = request
        .timeframe
        .unwrap_or_else(|| state.config.default_timeframe.clone());

    let snapshot = state.engine.evaluate(&request.candles, timeframe);

    info!(
        %request_id,
        received = request.candles.len(),
        candles_used = snapshot.candles_used,
        timeframe = %snapshot.timeframe,
        overall = %snapshot.overall,
        "signals computed"
    );

    Ok(Json(snapshot))
}
