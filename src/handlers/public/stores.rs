use axum::{extract::State, response::Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::collate;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/stores - Distinct store names across live offers
///
/// Public, no authorization. An offer contributes its store name when its
/// status is in the active set and it has either no expiry or an expiry
/// that has not yet passed. Names are deduplicated and alphabetized with
/// locale-aware collation.
pub async fn list_stores(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rows = state.store.fetch_store_rows().await?;

    let now = Utc::now();
    let names = rows
        .into_iter()
        .filter(|row| row.is_publicly_listed(now))
        .filter_map(|row| row.store_name);

    let stores = collate::dedupe_and_sort(names);

    Ok(Json(json!({ "stores": stores })))
}
