pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the deals store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Moderation status of an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferStatus {
    Pending,
    Approved,
    Published,
    Rejected,
    Expired,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Approved => "approved",
            OfferStatus::Published => "published",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OfferStatus::Pending),
            "approved" => Some(OfferStatus::Approved),
            "published" => Some(OfferStatus::Published),
            "rejected" => Some(OfferStatus::Rejected),
            "expired" => Some(OfferStatus::Expired),
            _ => None,
        }
    }

    /// Whether offers in this status are publicly visible
    pub fn is_active(&self) -> bool {
        matches!(self, OfferStatus::Approved | OfferStatus::Published)
    }
}

/// Projection of an offer row consumed by the public store listing
#[derive(Debug, Clone)]
pub struct StoreRow {
    pub store_name: Option<String>,
    pub status: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoreRow {
    /// Eligibility for the public listing: active status, and either no
    /// expiry or an expiry that has not yet passed (`now` itself counts).
    /// Statuses the store does not recognize are treated as inactive.
    pub fn is_publicly_listed(&self, now: DateTime<Utc>) -> bool {
        let active = OfferStatus::parse(&self.status).is_some_and(|s| s.is_active());
        active && self.expires_at.map_or(true, |t| t >= now)
    }
}

/// Append-only audit record describing a moderation action
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub actor_id: Uuid,
    pub action: &'static str,
    pub target: String,
    pub detail: Value,
}

/// Row-storage backend for offers, reputation counters, and metrics.
///
/// One method per remote effect a handler may perform. The production
/// implementation is [`postgres::PgDealsStore`]; tests substitute stubs to
/// assert call counts and inject failures.
#[async_trait]
pub trait DealsStore: Send + Sync {
    /// Mark an offer expired by setting its expiry timestamp to the
    /// backend's current time. Idempotent at the observable level.
    async fn expire_offer(&self, offer_id: Uuid) -> Result<(), StoreError>;

    /// Single-row moderation status update (approve / reject).
    async fn set_offer_status(&self, offer_id: Uuid, status: OfferStatus)
        -> Result<(), StoreError>;

    /// Invoke the `increment_offers_rejected_count` remote procedure for a
    /// user. Not idempotent; each call increases the counter by one.
    async fn increment_rejected_count(&self, user_id: &str) -> Result<(), StoreError>;

    /// Invoke the `refresh_offer_performance_metrics` remote procedure.
    async fn refresh_performance_metrics(&self) -> Result<(), StoreError>;

    /// Fetch the store-name projection of all offers for the public listing.
    async fn fetch_store_rows(&self) -> Result<Vec<StoreRow>, StoreError>;

    /// Append an audit record. Callers treat failures as soft.
    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StoreError>;

    /// Connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
