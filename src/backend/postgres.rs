use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use super::{AuditEntry, DealsStore, OfferStatus, StoreError, StoreRow};
use crate::config::DatabaseConfig;

/// Build the shared connection pool from `DATABASE_URL`
pub async fn connect_pool(cfg: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let url =
        std::env::var("DATABASE_URL").map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;

    PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.connection_timeout))
        .connect(&url)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))
}

/// Production [`DealsStore`] backed by the platform's Postgres database
pub struct PgDealsStore {
    pool: PgPool,
}

impl PgDealsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DealsStore for PgDealsStore {
    async fn expire_offer(&self, offer_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("UPDATE offers SET expires_at = NOW() WHERE id = $1")
            .bind(offer_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_offer_status(
        &self,
        offer_id: Uuid,
        status: OfferStatus,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE offers SET status = $2 WHERE id = $1")
            .bind(offer_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn increment_rejected_count(&self, user_id: &str) -> Result<(), StoreError> {
        sqlx::query("SELECT increment_offers_rejected_count($1)")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn refresh_performance_metrics(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT refresh_offer_performance_metrics()")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch_store_rows(&self) -> Result<Vec<StoreRow>, StoreError> {
        let rows = sqlx::query("SELECT store_name, status, expires_at FROM offers")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| StoreRow {
                store_name: row.get("store_name"),
                status: row.get("status"),
                expires_at: row.get("expires_at"),
            })
            .collect())
    }

    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO moderation_audit (actor_id, action, target, detail) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(entry.actor_id)
        .bind(entry.action)
        .bind(&entry.target)
        .bind(&entry.detail)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
