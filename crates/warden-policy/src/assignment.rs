//! Role assignment mutations.
//!
//! # Purpose
//! Implements the three legal transitions of a `(subject, domain)` pair:
//! - unassigned → assigned(set) via [`add`]
//! - assigned(set) → assigned({role}) via [`replace`]
//! - assigned(set) → unassigned via [`remove_all`]
//!
//! # Key invariants
//! - The caller holds exclusive access to the [`RuleStore`] and has just
//!   reloaded it; these functions neither lock nor reload.
//! - A mutation that changes the snapshot is followed by a persist. When that
//!   persist fails the error is [`AssignError::PersistenceAfterMutation`].
//! - A no-op (duplicate add, replace by the identical sole role) changes
//!   nothing and persists nothing.
//!
//! Role names are not validated here; see [`crate::RoleWhitelist`].
use crate::errors::AssignError;
use crate::model::GroupingRule;
use crate::roles::RoleResolver;
use crate::rule_store::RuleStore;

/// Assign `role` to `subject` in `domain`.
///
/// Returns `false` when the exact tuple already exists.
pub async fn add(
    store: &mut RuleStore,
    subject: &str,
    role: &str,
    domain: &str,
) -> Result<bool, AssignError> {
    let rule = GroupingRule::new(subject, role, domain);
    if !store.snapshot_mut().push_grouping(rule) {
        tracing::debug!(subject, role, domain, "role already assigned");
        return Ok(false);
    }
    commit(store, "add").await?;
    Ok(true)
}

/// Replace every role of `subject` in `domain` with exactly `role`.
///
/// # Errors
/// - [`AssignError::NotFound`] when the subject holds no role in the domain.
/// - [`AssignError::PersistenceAfterMutation`] when the write-back fails.
pub async fn replace(
    store: &mut RuleStore,
    subject: &str,
    role: &str,
    domain: &str,
) -> Result<bool, AssignError> {
    ensure_assigned(store, subject, domain)?;
    if !store.snapshot_mut().replace_groupings(subject, role, domain) {
        tracing::debug!(subject, role, domain, "role replacement is a no-op");
        return Ok(false);
    }
    commit(store, "replace").await?;
    Ok(true)
}

/// Remove every role of `subject` in `domain`.
///
/// # Errors
/// - [`AssignError::NotFound`] when the subject holds no role in the domain.
/// - [`AssignError::PersistenceAfterMutation`] when the write-back fails.
pub async fn remove_all(
    store: &mut RuleStore,
    subject: &str,
    domain: &str,
) -> Result<bool, AssignError> {
    ensure_assigned(store, subject, domain)?;
    if store.snapshot_mut().remove_groupings(subject, domain) == 0 {
        return Ok(false);
    }
    commit(store, "remove_all").await?;
    Ok(true)
}

fn ensure_assigned(store: &RuleStore, subject: &str, domain: &str) -> Result<(), AssignError> {
    let roles = RoleResolver::new(store.all_grouping_rules()).roles_of(subject, domain);
    if roles.is_empty() {
        return Err(AssignError::NotFound {
            subject: subject.to_string(),
            domain: domain.to_string(),
        });
    }
    Ok(())
}

async fn commit(store: &RuleStore, op: &'static str) -> Result<(), AssignError> {
    store
        .persist()
        .await
        .map_err(AssignError::PersistenceAfterMutation)?;
    metrics::counter!("warden_assignment_changes_total", "op" => op).increment(1);
    Ok(())
}
