use axum::http::HeaderMap;

use super::identity::{Caller, IdentityProvider, PrivilegeTier};
use crate::error::ApiError;

/// Session cookie consulted when no bearer token is present
pub const SESSION_COOKIE: &str = "aventa_session";

/// Authorization gate for the privileged mutation routes.
///
/// Re-resolves the caller identity from the request credentials and checks
/// the required tier. Read-only; the result is consumed by the handler and
/// never reused across requests. Handlers call this after input validation,
/// so a malformed body is rejected before any identity lookup happens.
pub async fn authorize(
    identity: &dyn IdentityProvider,
    headers: &HeaderMap,
    tier: PrivilegeTier,
) -> Result<Caller, ApiError> {
    let token =
        extract_credentials(headers).ok_or_else(|| ApiError::unauthenticated("sesión requerida"))?;

    let caller = identity.resolve(&token).await?;

    if !caller.has(tier) {
        tracing::warn!(
            caller = %caller.id,
            tier = tier.as_str(),
            "privileged request denied"
        );
        return Err(ApiError::forbidden("permisos insuficientes"));
    }

    Ok(caller)
}

/// Extract credentials from the request: `Authorization: Bearer <token>`
/// first, session cookie as fallback.
pub fn extract_credentials(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = bearer_token(headers) {
        return Some(token);
    }
    session_cookie(headers)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get("authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get("cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}
