use axum::{extract::State, http::HeaderMap, response::Json};
use serde_json::{json, Value};

use super::{append_audit_best_effort, parse_offer_id};
use crate::auth::gate::authorize;
use crate::auth::identity::PrivilegeTier;
use crate::backend::AuditEntry;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/admin/expire-offer - Mark an offer expired as of now
///
/// Requires the `moderation` tier. The write sets the offer's expiry
/// timestamp to the backend's current time, so repeating the call leaves
/// the same observable state.
pub async fn expire_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let offer_id = parse_offer_id(payload.as_deref())?;

    let caller = authorize(state.identity.as_ref(), &headers, PrivilegeTier::Moderation).await?;

    state.store.expire_offer(offer_id).await?;

    append_audit_best_effort(
        state.store.as_ref(),
        AuditEntry {
            actor_id: caller.id,
            action: "expire_offer",
            target: offer_id.to_string(),
            detail: json!({ "expires_at": "now()" }),
        },
    )
    .await;

    Ok(Json(json!({ "ok": true })))
}
