use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{admin, public};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(store_routes())
        // Privileged actions (gated per-route inside the handlers)
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn store_routes() -> Router<AppState> {
    Router::new().route("/api/stores", get(public::list_stores))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/expire-offer", post(admin::expire_offer))
        .route("/api/admin/approve-offer", post(admin::approve_offer))
        .route("/api/admin/reject-offer", post(admin::reject_offer))
        .route("/api/admin/increment-rejected", post(admin::increment_rejected))
        .route("/api/admin/refresh-metrics", post(admin::refresh_metrics))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "AVENTA API",
        "version": version,
        "description": "Moderation and listing API for the AVENTA community deals platform",
        "endpoints": {
            "stores": "GET /api/stores (public)",
            "health": "GET /health (public)",
            "expire_offer": "POST /api/admin/expire-offer (moderation)",
            "approve_offer": "POST /api/admin/approve-offer (moderation)",
            "reject_offer": "POST /api/admin/reject-offer (moderation)",
            "increment_rejected": "POST /api/admin/increment-rejected (moderation)",
            "refresh_metrics": "POST /api/admin/refresh-metrics (metrics)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "error"
                })),
            )
        }
    }
}
