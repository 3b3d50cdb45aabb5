pub mod expire_offer;
pub mod refresh_metrics;
pub mod rejected_count;
pub mod status;

// Re-export handler functions for use in routing
pub use expire_offer::expire_offer;
pub use refresh_metrics::refresh_metrics;
pub use rejected_count::increment_rejected;
pub use status::{approve_offer, reject_offer};

use serde_json::Value;
use uuid::Uuid;

use crate::backend::{AuditEntry, DealsStore};
use crate::error::ApiError;

/// Append an audit record without letting a failure escalate.
///
/// Audit-log availability must never block or roll back a moderation
/// action: errors here are logged at warn level and swallowed, and the
/// primary operation still reports success.
pub(crate) async fn append_audit_best_effort(store: &dyn DealsStore, entry: AuditEntry) {
    if let Err(err) = store.append_audit(&entry).await {
        tracing::warn!(
            action = entry.action,
            target = %entry.target,
            "audit append failed, continuing: {}",
            err
        );
    }
}

/// Pull a well-formed `offerId` out of the request body. Anything else
/// (missing body, missing field, non-string, malformed UUID) is the same
/// client error.
pub(crate) fn parse_offer_id(payload: Option<&Value>) -> Result<Uuid, ApiError> {
    payload
        .and_then(|p| p.get("offerId"))
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ApiError::bad_request("offerId obligatorio"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn offer_id_accepts_valid_uuid() {
        let id = Uuid::new_v4();
        let body = json!({ "offerId": id.to_string() });
        assert_eq!(parse_offer_id(Some(&body)).unwrap(), id);
    }

    #[test]
    fn offer_id_rejects_missing_and_malformed() {
        for body in [
            None,
            Some(json!({})),
            Some(json!({ "offerId": "not-a-uuid" })),
            Some(json!({ "offerId": 42 })),
        ] {
            let err = parse_offer_id(body.as_ref()).unwrap_err();
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.message(), "offerId obligatorio");
        }
    }
}
