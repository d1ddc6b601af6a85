//! Shared policy service: the operation surface used by request handlers.
//!
//! # Purpose
//! Owns the single [`RuleStore`] behind a `tokio::sync::RwLock` and applies
//! the reload-before-every-operation discipline.
//!
//! # Concurrency model
//! - Writers take the write guard and hold it across reload → mutate →
//!   persist, so two in-process writers can never lose each other's update.
//! - Readers take the read guard and evaluate against a freshly fetched
//!   snapshot. Readers run in parallel with each other and never observe a
//!   writer's half-applied mutation.
//! - Edits to the persistent medium by other processes between a writer's
//!   reload and persist are not detected; the later save wins.
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use warden_policy::{GroupingRule, MemoryAdapter, PermissionRule, PolicyService, PolicySnapshot};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = MemoryAdapter::new(PolicySnapshot::new(
//!     vec![PermissionRule::allow("owner", "teamX", "repo1", "write")],
//!     vec![GroupingRule::new("alice", "owner", "teamX")],
//! ));
//! let service = PolicyService::new(Arc::new(adapter));
//! let decision = service.enforce("alice", "teamX", "repo1", "write").await?;
//! assert!(decision.allowed);
//! # Ok(())
//! # }
//! ```
use crate::adapter::PolicyAdapter;
use crate::assignment;
use crate::enforcer;
use crate::errors::{AssignError, EngineError};
use crate::model::{AccessRequest, Decision, GroupingRule, PermissionRule};
use crate::roles::RoleResolver;
use crate::rule_store::{PolicySnapshot, RuleStore};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct PolicyService {
    store: Arc<RwLock<RuleStore>>,
    adapter: Arc<dyn PolicyAdapter>,
}

impl PolicyService {
    pub fn new(adapter: Arc<dyn PolicyAdapter>) -> Self {
        Self {
            store: Arc::new(RwLock::new(RuleStore::new(adapter.clone()))),
            adapter,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.adapter.backend_name()
    }

    pub fn is_durable(&self) -> bool {
        self.adapter.is_durable()
    }

    async fn fresh_snapshot(&self) -> Result<PolicySnapshot, EngineError> {
        let store = self.store.read().await;
        Ok(store.fetch().await?)
    }

    /// Decide whether `subject` may perform `action` on `object` in `domain`.
    ///
    /// # Errors
    /// - [`EngineError::Store`] when the policy cannot be reloaded. A request
    ///   that matches nothing is an ordinary deny decision.
    pub async fn enforce(
        &self,
        subject: &str,
        domain: &str,
        object: &str,
        action: &str,
    ) -> Result<Decision, EngineError> {
        let snapshot = self.fresh_snapshot().await?;
        let request = AccessRequest::new(subject, domain, object, action);
        let decision = enforcer::decide(&snapshot, &request);
        let outcome = if decision.allowed { "allow" } else { "deny" };
        metrics::counter!("warden_enforce_total", "decision" => outcome).increment(1);
        tracing::debug!(
            subject,
            domain,
            object,
            action,
            decision = outcome,
            reason = ?decision.reason,
            "enforced"
        );
        Ok(decision)
    }

    pub async fn list_domains(&self) -> Result<BTreeSet<String>, EngineError> {
        Ok(self.fresh_snapshot().await?.distinct_domains())
    }

    pub async fn list_roles(&self) -> Result<BTreeSet<String>, EngineError> {
        Ok(self.fresh_snapshot().await?.distinct_roles())
    }

    /// Grouping rules whose domain is `domain`, in stored order.
    pub async fn list_members(&self, domain: &str) -> Result<Vec<GroupingRule>, EngineError> {
        Ok(self.fresh_snapshot().await?.grouping_rules_in_domain(domain))
    }

    pub async fn list_permission_rules(&self) -> Result<Vec<PermissionRule>, EngineError> {
        Ok(self.fresh_snapshot().await?.all_permission_rules().to_vec())
    }

    pub async fn list_grouping_rules(&self) -> Result<Vec<GroupingRule>, EngineError> {
        Ok(self.fresh_snapshot().await?.all_grouping_rules().to_vec())
    }

    pub async fn roles_of(&self, subject: &str, domain: &str) -> Result<Vec<String>, EngineError> {
        let snapshot = self.fresh_snapshot().await?;
        Ok(RoleResolver::new(snapshot.all_grouping_rules()).roles_of(subject, domain))
    }

    pub async fn subjects_of(&self, role: &str, domain: &str) -> Result<Vec<String>, EngineError> {
        let snapshot = self.fresh_snapshot().await?;
        Ok(RoleResolver::new(snapshot.all_grouping_rules()).subjects_of(role, domain))
    }

    /// Assign `role` to `subject` in `domain`; `false` if already assigned.
    pub async fn assign_role(
        &self,
        subject: &str,
        role: &str,
        domain: &str,
    ) -> Result<bool, AssignError> {
        let mut store = self.store.write().await;
        store.reload().await?;
        let added = assignment::add(&mut store, subject, role, domain).await?;
        tracing::info!(subject, role, domain, added, "assign role");
        Ok(added)
    }

    /// Atomically swap every role of `subject` in `domain` for `role`.
    pub async fn replace_role(
        &self,
        subject: &str,
        role: &str,
        domain: &str,
    ) -> Result<bool, AssignError> {
        let mut store = self.store.write().await;
        store.reload().await?;
        let replaced = assignment::replace(&mut store, subject, role, domain).await?;
        tracing::info!(subject, role, domain, replaced, "replace role");
        Ok(replaced)
    }

    pub async fn remove_all_roles(&self, subject: &str, domain: &str) -> Result<bool, AssignError> {
        let mut store = self.store.write().await;
        store.reload().await?;
        let removed = assignment::remove_all(&mut store, subject, domain).await?;
        tracing::info!(subject, domain, removed, "remove all roles");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::memory::MemoryAdapter;
    use crate::model::DecisionReason;

    fn service_with(snapshot: PolicySnapshot) -> (PolicyService, Arc<MemoryAdapter>) {
        let adapter = Arc::new(MemoryAdapter::new(snapshot));
        (PolicyService::new(adapter.clone()), adapter)
    }

    #[tokio::test]
    async fn reads_observe_external_edits() {
        let (service, adapter) = service_with(PolicySnapshot::default());
        assert!(service.list_roles().await.expect("roles").is_empty());

        adapter
            .replace(PolicySnapshot::new(
                vec![PermissionRule::allow("owner", "teamX", "repo1", "write")],
                vec![GroupingRule::new("alice", "owner", "teamX")],
            ))
            .await;

        let roles = service.list_roles().await.expect("roles");
        assert!(roles.contains("owner"));
        let decision = service
            .enforce("alice", "teamX", "repo1", "write")
            .await
            .expect("enforce");
        assert_eq!(decision.reason, DecisionReason::Allowed);
    }

    #[tokio::test]
    async fn writes_start_from_latest_persisted_state() {
        let (service, adapter) = service_with(PolicySnapshot::default());
        service
            .assign_role("alice", "owner", "teamX")
            .await
            .expect("assign");

        adapter
            .replace(PolicySnapshot::new(
                vec![],
                vec![GroupingRule::new("bob", "moderator", "teamX")],
            ))
            .await;

        service
            .assign_role("carol", "owner", "teamX")
            .await
            .expect("assign");
        let members = service.list_members("teamX").await.expect("members");
        assert_eq!(
            members,
            vec![
                GroupingRule::new("bob", "moderator", "teamX"),
                GroupingRule::new("carol", "owner", "teamX"),
            ]
        );
    }

    #[tokio::test]
    async fn subjects_and_roles_queries() {
        let (service, _) = service_with(PolicySnapshot::new(
            vec![],
            vec![
                GroupingRule::new("alice", "owner", "teamX"),
                GroupingRule::new("owner", "member", "teamX"),
            ],
        ));
        assert_eq!(
            service.roles_of("alice", "teamX").await.expect("roles"),
            vec!["owner", "member"]
        );
        assert_eq!(
            service.subjects_of("member", "teamX").await.expect("subjects"),
            vec!["owner", "alice"]
        );
        assert_eq!(service.backend_name(), "memory");
        assert!(!service.is_durable());
    }
}
