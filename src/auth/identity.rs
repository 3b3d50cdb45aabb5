use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use super::decode_jwt;

/// Named privilege tiers required by the mutation routes.
///
/// Tiers are independent, not ordered: holding one says nothing about the
/// other. Destructive moderation actions need [`Moderation`]; recomputing
/// aggregate metrics needs [`Metrics`].
///
/// [`Moderation`]: PrivilegeTier::Moderation
/// [`Metrics`]: PrivilegeTier::Metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegeTier {
    Moderation,
    Metrics,
}

impl PrivilegeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivilegeTier::Moderation => "moderation",
            PrivilegeTier::Metrics => "metrics",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "moderation" => Some(PrivilegeTier::Moderation),
            "metrics" => Some(PrivilegeTier::Metrics),
            _ => None,
        }
    }
}

/// Resolved caller identity. Built fresh for each request and dropped when
/// the request completes; never cached across requests.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: Uuid,
    pub grants: HashSet<PrivilegeTier>,
}

impl Caller {
    pub fn has(&self, tier: PrivilegeTier) -> bool {
        self.grants.contains(&tier)
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid credentials: {0}")]
    InvalidToken(String),

    #[error("no profile for subject {0}")]
    UnknownSubject(Uuid),

    #[error("identity backend unavailable: {0}")]
    Unavailable(String),
}

/// Resolves caller identity and privilege grants from request credentials
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Caller, IdentityError>;
}

/// Production resolver: validates the session JWT locally, then reads the
/// subject's current grants from the `profiles` table. The per-request read
/// is what makes role changes take effect on the next call rather than
/// living on in old tokens.
pub struct JwtIdentityProvider {
    secret: String,
    pool: PgPool,
}

impl JwtIdentityProvider {
    pub fn new(secret: impl Into<String>, pool: PgPool) -> Self {
        Self {
            secret: secret.into(),
            pool,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Caller, IdentityError> {
        let claims = decode_jwt(token, &self.secret).map_err(IdentityError::InvalidToken)?;

        let row = sqlx::query("SELECT grants FROM profiles WHERE id = $1")
            .bind(claims.sub)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?
            .ok_or(IdentityError::UnknownSubject(claims.sub))?;

        let grants: Vec<String> = row.get("grants");
        let grants = grants
            .iter()
            .filter_map(|g| PrivilegeTier::parse(g))
            .collect();

        Ok(Caller {
            id: claims.sub,
            grants,
        })
    }
}
