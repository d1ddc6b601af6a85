//! In-memory policy adapter.
//!
//! Not durable: the snapshot is lost on restart. Loads and saves clone the
//! whole snapshot under a `tokio::sync::RwLock`, so the adapter behaves like
//! an external medium (callers never share the adapter's copy).
use super::PolicyAdapter;
use crate::errors::StoreResult;
use crate::rule_store::PolicySnapshot;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryAdapter {
    snapshot: RwLock<PolicySnapshot>,
}

impl MemoryAdapter {
    pub fn new(snapshot: PolicySnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Overwrite the stored snapshot, simulating an out-of-band edit.
    pub async fn replace(&self, snapshot: PolicySnapshot) {
        *self.snapshot.write().await = snapshot;
    }
}

#[async_trait]
impl PolicyAdapter for MemoryAdapter {
    async fn load(&self) -> StoreResult<PolicySnapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &PolicySnapshot) -> StoreResult<()> {
        *self.snapshot.write().await = snapshot.clone();
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
