use axum::{extract::State, http::HeaderMap, response::Json};
use serde_json::{json, Value};

use crate::auth::gate::authorize;
use crate::auth::identity::PrivilegeTier;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/admin/increment-rejected - Bump a user's rejected-offers counter
///
/// Requires the `moderation` tier. Invokes the
/// `increment_offers_rejected_count` remote procedure; each call adds one,
/// so double-submitting double-counts. An RPC failure is reported in-band
/// as `{ok:false}` with transport status 200.
pub async fn increment_rejected(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let user_id = payload
        .as_deref()
        .and_then(|p| p.get("userId"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request("userId obligatorio"))?;

    authorize(state.identity.as_ref(), &headers, PrivilegeTier::Moderation).await?;

    match state.store.increment_rejected_count(&user_id).await {
        Ok(()) => Ok(Json(json!({ "ok": true }))),
        Err(err) => {
            tracing::warn!("rejected-count increment failed for {}: {}", user_id, err);
            Ok(Json(json!({ "ok": false })))
        }
    }
}
