#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use aventa_api::app::app;
use aventa_api::auth::identity::{Caller, IdentityError, IdentityProvider, PrivilegeTier};
use aventa_api::backend::{AuditEntry, DealsStore, OfferStatus, StoreError, StoreRow};
use aventa_api::state::AppState;

// Fixed identities registered by default_identity()
pub const MOD_TOKEN: &str = "moderator-token";
pub const METRICS_TOKEN: &str = "metrics-token";
pub const PLAIN_TOKEN: &str = "plain-token";

pub fn moderator_id() -> Uuid {
    Uuid::from_u128(1)
}

pub fn metrics_id() -> Uuid {
    Uuid::from_u128(2)
}

pub fn plain_id() -> Uuid {
    Uuid::from_u128(3)
}

/// In-memory offer state held by the stub store
#[derive(Debug, Clone)]
pub struct StubOffer {
    pub status: OfferStatus,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Default for StubOffer {
    fn default() -> Self {
        Self {
            status: OfferStatus::Pending,
            expires_at: None,
        }
    }
}

/// Per-method invocation counters, for "no backend call was made" assertions
#[derive(Default)]
pub struct CallCounters {
    pub expire: AtomicUsize,
    pub set_status: AtomicUsize,
    pub increment_rejected: AtomicUsize,
    pub refresh_metrics: AtomicUsize,
    pub fetch_rows: AtomicUsize,
    pub audit: AtomicUsize,
}

impl CallCounters {
    pub fn mutations(&self) -> usize {
        self.expire.load(Ordering::SeqCst)
            + self.set_status.load(Ordering::SeqCst)
            + self.increment_rejected.load(Ordering::SeqCst)
            + self.refresh_metrics.load(Ordering::SeqCst)
    }
}

fn stub_failure(what: &str) -> StoreError {
    StoreError::Sqlx(sqlx::Error::Protocol(format!("stub {} failure", what)))
}

/// Stub [`DealsStore`] with injectable failures
#[derive(Default)]
pub struct StubStore {
    pub offers: Mutex<HashMap<Uuid, StubOffer>>,
    pub store_rows: Mutex<Vec<StoreRow>>,
    pub rejected_counts: Mutex<HashMap<String, u32>>,
    pub audit: Mutex<Vec<AuditEntry>>,
    pub calls: CallCounters,
    pub fail_writes: AtomicBool,
    pub fail_rpc: AtomicBool,
    pub fail_reads: AtomicBool,
    pub fail_audit: AtomicBool,
}

impl StubStore {
    pub fn with_offer(self, id: Uuid, offer: StubOffer) -> Self {
        self.offers.lock().unwrap().insert(id, offer);
        self
    }

    pub fn with_store_rows(self, rows: Vec<StoreRow>) -> Self {
        *self.store_rows.lock().unwrap() = rows;
        self
    }
}

#[async_trait]
impl DealsStore for StubStore {
    async fn expire_offer(&self, offer_id: Uuid) -> Result<(), StoreError> {
        self.calls.expire.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(stub_failure("write"));
        }
        // Mirrors the single-row UPDATE: unknown ids are a no-op
        if let Some(offer) = self.offers.lock().unwrap().get_mut(&offer_id) {
            offer.expires_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn set_offer_status(
        &self,
        offer_id: Uuid,
        status: OfferStatus,
    ) -> Result<(), StoreError> {
        self.calls.set_status.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(stub_failure("write"));
        }
        if let Some(offer) = self.offers.lock().unwrap().get_mut(&offer_id) {
            offer.status = status;
        }
        Ok(())
    }

    async fn increment_rejected_count(&self, user_id: &str) -> Result<(), StoreError> {
        self.calls.increment_rejected.fetch_add(1, Ordering::SeqCst);
        if self.fail_rpc.load(Ordering::SeqCst) {
            return Err(stub_failure("rpc"));
        }
        *self
            .rejected_counts
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_insert(0) += 1;
        Ok(())
    }

    async fn refresh_performance_metrics(&self) -> Result<(), StoreError> {
        self.calls.refresh_metrics.fetch_add(1, Ordering::SeqCst);
        if self.fail_rpc.load(Ordering::SeqCst) {
            return Err(stub_failure("rpc"));
        }
        Ok(())
    }

    async fn fetch_store_rows(&self) -> Result<Vec<StoreRow>, StoreError> {
        self.calls.fetch_rows.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(stub_failure("read"));
        }
        Ok(self.store_rows.lock().unwrap().clone())
    }

    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        self.calls.audit.fetch_add(1, Ordering::SeqCst);
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(stub_failure("audit"));
        }
        self.audit.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Stub [`IdentityProvider`] keyed by opaque tokens
#[derive(Default)]
pub struct StubIdentity {
    pub tokens: Mutex<HashMap<String, Caller>>,
    pub unavailable: AtomicBool,
}

impl StubIdentity {
    pub fn with_caller(self, token: &str, id: Uuid, grants: &[PrivilegeTier]) -> Self {
        self.tokens.lock().unwrap().insert(
            token.to_string(),
            Caller {
                id,
                grants: grants.iter().copied().collect(),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn resolve(&self, token: &str) -> Result<Caller, IdentityError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(IdentityError::Unavailable("stub offline".to_string()));
        }
        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::InvalidToken("unknown token".to_string()))
    }
}

/// Identity stub with one caller per tier plus one with no grants
pub fn default_identity() -> StubIdentity {
    StubIdentity::default()
        .with_caller(MOD_TOKEN, moderator_id(), &[PrivilegeTier::Moderation])
        .with_caller(METRICS_TOKEN, metrics_id(), &[PrivilegeTier::Metrics])
        .with_caller(PLAIN_TOKEN, plain_id(), &[])
}

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<StubStore>,
    pub identity: Arc<StubIdentity>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve the real router around stub collaborators on an unused port
pub async fn spawn(store: StubStore, identity: StubIdentity) -> Result<TestServer> {
    let store = Arc::new(store);
    let identity = Arc::new(identity);

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let state = AppState::new(store.clone(), identity.clone());
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        store,
        identity,
        client: reqwest::Client::new(),
    })
}

pub async fn spawn_default() -> Result<TestServer> {
    spawn(StubStore::default(), default_identity()).await
}
