//! Persistence backends for policy snapshots.
//!
//! # Purpose
//! A [`PolicyAdapter`] moves a whole [`PolicySnapshot`] to and from a
//! persistence medium. The engine never does partial writes: every save
//! replaces both relations.
//!
//! # Backends
//! - [`file::FileAdapter`]: Casbin-style CSV policy file (default).
//! - [`memory::MemoryAdapter`]: non-durable, for tests and local runs.
//! - [`postgres::PostgresAdapter`]: two tables in Postgres via `sqlx`.
//!
//! # Key invariants
//! - `load` is all-or-nothing; a parse or I/O failure yields an error and no
//!   partial snapshot.
//! - `save` is atomic from the point of view of a concurrent `load`.
use crate::errors::StoreResult;
use crate::rule_store::PolicySnapshot;
use async_trait::async_trait;

pub mod file;
pub mod memory;
pub mod postgres;

#[async_trait]
pub trait PolicyAdapter: Send + Sync {
    async fn load(&self) -> StoreResult<PolicySnapshot>;
    async fn save(&self, snapshot: &PolicySnapshot) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
