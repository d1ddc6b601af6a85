//! Postgres-backed policy adapter.
//!
//! # Data model
//! Two tables, one per relation, created by the embedded migrations:
//! - `rbac_permission_rules(position, subject, domain, object, action, effect)`
//! - `rbac_grouping_rules(position, subject, role, domain)`
//!
//! `position` is the row's index in the snapshot and keeps insertion order
//! stable across saves.
//!
//! # Consistency
//! - `load` reads both tables inside one `REPEATABLE READ` transaction so it
//!   never mixes two different saves.
//! - `save` truncates and rewrites both tables in one transaction.
//!
//! # Operational notes
//! - Database URLs may contain credentials; they are never logged.
//! - `acquire_timeout` bounds how long a request waits for a connection.
use super::PolicyAdapter;
use crate::errors::{StoreError, StoreResult};
use crate::model::{GroupingRule, PermissionRule};
use crate::rule_store::PolicySnapshot;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Connection settings for [`PostgresAdapter::connect`].
#[derive(Debug, Clone)]
pub struct PostgresSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Clone, FromRow)]
struct DbPermission {
    subject: String,
    domain: String,
    object: String,
    action: String,
    effect: String,
}

#[derive(Debug, Clone, FromRow)]
struct DbGrouping {
    subject: String,
    role: String,
    domain: String,
}

pub struct PostgresAdapter {
    pool: PgPool,
}

impl PostgresAdapter {
    /// Connect, then apply the embedded migrations before returning.
    ///
    /// # Errors
    /// - [`StoreError::Database`] for connection or pool failures.
    /// - [`StoreError::Migrate`] when the schema cannot be brought up to date.
    pub async fn connect(settings: &PostgresSettings) -> StoreResult<Self> {
        let connect_options = PgConnectOptions::from_str(&settings.url)?;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool. The schema must already exist.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyAdapter for PostgresAdapter {
    async fn load(&self) -> StoreResult<PolicySnapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;
        let permissions: Vec<DbPermission> = sqlx::query_as(
            "SELECT subject, domain, object, action, effect \
             FROM rbac_permission_rules ORDER BY position",
        )
        .fetch_all(&mut *tx)
        .await?;
        let groupings: Vec<DbGrouping> = sqlx::query_as(
            "SELECT subject, role, domain FROM rbac_grouping_rules ORDER BY position",
        )
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        let permissions = permissions
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let effect = row
                    .effect
                    .parse()
                    .map_err(|message: String| StoreError::parse(index + 1, message))?;
                Ok(PermissionRule::new(
                    row.subject,
                    row.domain,
                    row.object,
                    row.action,
                    effect,
                ))
            })
            .collect::<StoreResult<Vec<_>>>()?;
        let groupings = groupings
            .into_iter()
            .map(|row| GroupingRule::new(row.subject, row.role, row.domain))
            .collect();
        Ok(PolicySnapshot::new(permissions, groupings))
    }

    async fn save(&self, snapshot: &PolicySnapshot) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM rbac_permission_rules")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM rbac_grouping_rules")
            .execute(&mut *tx)
            .await?;
        for (position, rule) in snapshot.all_permission_rules().iter().enumerate() {
            sqlx::query(
                "INSERT INTO rbac_permission_rules \
                 (position, subject, domain, object, action, effect) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(position as i64)
            .bind(&rule.subject)
            .bind(&rule.domain)
            .bind(&rule.object)
            .bind(&rule.action)
            .bind(rule.effect.as_str())
            .execute(&mut *tx)
            .await?;
        }
        for (position, rule) in snapshot.all_grouping_rules().iter().enumerate() {
            sqlx::query(
                "INSERT INTO rbac_grouping_rules (position, subject, role, domain) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(position as i64)
            .bind(&rule.subject)
            .bind(&rule.role)
            .bind(&rule.domain)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
