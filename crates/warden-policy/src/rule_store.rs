//! In-memory rule snapshot and its persistence lifecycle.
//!
//! # Purpose
//! Holds the permission and grouping relations as one [`PolicySnapshot`] and
//! moves it to and from a [`PolicyAdapter`] wholesale.
//!
//! # Key invariants
//! - A load either produces a complete snapshot or an error; a failed reload
//!   leaves the previous snapshot untouched.
//! - Row order is insertion order. Mutations never reorder unrelated rows.
//! - Grouping mutation primitives are crate-private: only the assignment
//!   manager changes grouping rules, and permission rules are read-only.
use crate::adapter::PolicyAdapter;
use crate::errors::StoreResult;
use crate::model::{GroupingRule, PermissionRule};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySnapshot {
    permissions: Vec<PermissionRule>,
    groupings: Vec<GroupingRule>,
}

impl PolicySnapshot {
    pub fn new(permissions: Vec<PermissionRule>, groupings: Vec<GroupingRule>) -> Self {
        Self {
            permissions,
            groupings,
        }
    }

    pub fn all_permission_rules(&self) -> &[PermissionRule] {
        &self.permissions
    }

    pub fn all_grouping_rules(&self) -> &[GroupingRule] {
        &self.groupings
    }

    pub fn grouping_rules_in_domain(&self, domain: &str) -> Vec<GroupingRule> {
        self.groupings
            .iter()
            .filter(|rule| rule.domain == domain)
            .cloned()
            .collect()
    }

    /// Domains named by any permission or grouping rule.
    pub fn distinct_domains(&self) -> BTreeSet<String> {
        self.permissions
            .iter()
            .map(|rule| rule.domain.clone())
            .chain(self.groupings.iter().map(|rule| rule.domain.clone()))
            .collect()
    }

    /// Values that appear in the `role` position of a grouping rule.
    pub fn distinct_roles(&self) -> BTreeSet<String> {
        self.groupings.iter().map(|rule| rule.role.clone()).collect()
    }

    pub fn contains_grouping(&self, rule: &GroupingRule) -> bool {
        self.groupings.contains(rule)
    }

    /// Append `rule` unless an equal tuple exists. Returns whether it was added.
    pub(crate) fn push_grouping(&mut self, rule: GroupingRule) -> bool {
        if self.contains_grouping(&rule) {
            return false;
        }
        self.groupings.push(rule);
        true
    }

    /// Drop every grouping rule for `(subject, domain)`. Returns how many went.
    pub(crate) fn remove_groupings(&mut self, subject: &str, domain: &str) -> usize {
        let before = self.groupings.len();
        self.groupings.retain(|rule| !rule.is_for(subject, domain));
        before - self.groupings.len()
    }

    /// Collapse the grouping rules for `(subject, domain)` into the single
    /// tuple `(subject, role, domain)`, placed where the first old tuple was.
    ///
    /// Returns `false` without touching anything when there is nothing to
    /// replace or the existing set already is exactly that tuple.
    pub(crate) fn replace_groupings(&mut self, subject: &str, role: &str, domain: &str) -> bool {
        let replacement = GroupingRule::new(subject, role, domain);
        let mut existing = self.groupings.iter().filter(|rule| rule.is_for(subject, domain));
        let Some(first) = existing.next() else {
            return false;
        };
        if *first == replacement && existing.next().is_none() {
            return false;
        }
        let Some(position) = self
            .groupings
            .iter()
            .position(|rule| rule.is_for(subject, domain))
        else {
            return false;
        };
        self.groupings.retain(|rule| !rule.is_for(subject, domain));
        self.groupings.insert(position, replacement);
        true
    }
}

/// The shared rule store: a snapshot plus the adapter it came from.
///
/// `RuleStore` does no locking of its own; [`crate::PolicyService`] owns it
/// behind a read/write lock.
pub struct RuleStore {
    adapter: Arc<dyn PolicyAdapter>,
    snapshot: PolicySnapshot,
}

impl RuleStore {
    /// Create a store with an empty snapshot. Call [`RuleStore::reload`]
    /// before reading.
    pub fn new(adapter: Arc<dyn PolicyAdapter>) -> Self {
        Self {
            adapter,
            snapshot: PolicySnapshot::default(),
        }
    }

    /// Replace the in-memory snapshot with the adapter's current contents.
    pub async fn reload(&mut self) -> StoreResult<()> {
        self.snapshot = self.fetch().await?;
        Ok(())
    }

    /// Load a fresh snapshot without replacing the in-memory one.
    ///
    /// Used by readers that hold only a shared lock.
    pub async fn fetch(&self) -> StoreResult<PolicySnapshot> {
        let snapshot = self.adapter.load().await.inspect_err(|err| {
            tracing::warn!(
                backend = self.adapter.backend_name(),
                error = %err,
                "policy reload failed"
            );
            metrics::counter!("warden_store_errors_total", "op" => "load").increment(1);
        })?;
        metrics::gauge!("warden_permission_rules").set(snapshot.permissions.len() as f64);
        metrics::gauge!("warden_grouping_rules").set(snapshot.groupings.len() as f64);
        Ok(snapshot)
    }

    /// Write the in-memory snapshot back, replacing the durable contents.
    pub async fn persist(&self) -> StoreResult<()> {
        self.adapter.save(&self.snapshot).await.inspect_err(|err| {
            tracing::error!(
                backend = self.adapter.backend_name(),
                error = %err,
                "policy persist failed"
            );
            metrics::counter!("warden_store_errors_total", "op" => "save").increment(1);
        })
    }

    pub fn snapshot(&self) -> &PolicySnapshot {
        &self.snapshot
    }

    pub(crate) fn snapshot_mut(&mut self) -> &mut PolicySnapshot {
        &mut self.snapshot
    }

    pub fn all_permission_rules(&self) -> &[PermissionRule] {
        self.snapshot.all_permission_rules()
    }

    pub fn all_grouping_rules(&self) -> &[GroupingRule] {
        self.snapshot.all_grouping_rules()
    }

    pub fn grouping_rules_in_domain(&self, domain: &str) -> Vec<GroupingRule> {
        self.snapshot.grouping_rules_in_domain(domain)
    }

    pub fn distinct_domains(&self) -> BTreeSet<String> {
        self.snapshot.distinct_domains()
    }

    pub fn distinct_roles(&self) -> BTreeSet<String> {
        self.snapshot.distinct_roles()
    }
}
