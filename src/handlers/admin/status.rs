use axum::{extract::State, http::HeaderMap, response::Json};
use serde_json::{json, Value};

use super::{append_audit_best_effort, parse_offer_id};
use crate::auth::gate::authorize;
use crate::auth::identity::PrivilegeTier;
use crate::backend::{AuditEntry, OfferStatus};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/admin/approve-offer - Publish an offer into the active set
pub async fn approve_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    set_status(state, headers, payload, OfferStatus::Approved, "approve_offer").await
}

/// POST /api/admin/reject-offer - Take an offer out of circulation
///
/// Rejecting only flips the status; the submitter's rejected counter is a
/// separate client-driven call to the increment-rejected action.
pub async fn reject_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    set_status(state, headers, payload, OfferStatus::Rejected, "reject_offer").await
}

async fn set_status(
    state: AppState,
    headers: HeaderMap,
    payload: Option<Json<Value>>,
    status: OfferStatus,
    action: &'static str,
) -> Result<Json<Value>, ApiError> {
    let offer_id = parse_offer_id(payload.as_deref())?;

    let caller = authorize(state.identity.as_ref(), &headers, PrivilegeTier::Moderation).await?;

    state.store.set_offer_status(offer_id, status).await?;

    append_audit_best_effort(
        state.store.as_ref(),
        AuditEntry {
            actor_id: caller.id,
            action,
            target: offer_id.to_string(),
            detail: json!({ "status": status.as_str() }),
        },
    )
    .await;

    Ok(Json(json!({ "ok": true })))
}
