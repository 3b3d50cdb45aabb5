use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::auth::gate::authorize;
use crate::auth::identity::PrivilegeTier;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/admin/refresh-metrics - Recompute the offer performance view
///
/// Requires the `metrics` tier, which is independent of `moderation`.
/// Invokes the `refresh_offer_performance_metrics` remote procedure and
/// answers 204 with an empty body.
pub async fn refresh_metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    authorize(state.identity.as_ref(), &headers, PrivilegeTier::Metrics).await?;

    state.store.refresh_performance_metrics().await?;

    Ok(StatusCode::NO_CONTENT)
}
