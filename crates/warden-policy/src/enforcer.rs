//! Enforcement decision procedure.
//!
//! # Purpose
//! Evaluates an [`AccessRequest`] against a [`PolicySnapshot`]: expand the
//! subject into its effective subjects, collect matching permission rules,
//! and combine their effects.
//!
//! # Key invariants
//! - Explicit deny overrides any number of allows.
//! - No matching rule is a deny (`DecisionReason::NoMatch`), not an error.
//! - The decision depends only on the snapshot contents, never on previous
//!   calls; rule order only picks which rule is reported as the explanation.
//!
//! The evaluation here is pure. Reloading before evaluation is the caller's
//! job (see [`crate::PolicyService::enforce`]).
use crate::model::{AccessRequest, Decision, Effect, PermissionRule};
use crate::roles::RoleResolver;
use crate::rule_store::PolicySnapshot;
use std::collections::HashSet;

/// The subject itself plus every role it transitively holds in `domain`.
pub fn effective_subjects(snapshot: &PolicySnapshot, subject: &str, domain: &str) -> HashSet<String> {
    let mut subjects: HashSet<String> = RoleResolver::new(snapshot.all_grouping_rules())
        .roles_of(subject, domain)
        .into_iter()
        .collect();
    subjects.insert(subject.to_string());
    subjects
}

pub fn decide(snapshot: &PolicySnapshot, request: &AccessRequest) -> Decision {
    let subjects = effective_subjects(snapshot, &request.subject, &request.domain);

    let mut first_allow: Option<&PermissionRule> = None;
    for rule in snapshot.all_permission_rules() {
        if !rule_matches(rule, &subjects, request) {
            continue;
        }
        match rule.effect {
            Effect::Deny => return Decision::explicit_deny(rule.clone()),
            Effect::Allow => {
                first_allow.get_or_insert(rule);
            }
        }
    }

    match first_allow {
        Some(rule) => Decision::allow(rule.clone()),
        None => Decision::no_match(),
    }
}

fn rule_matches(rule: &PermissionRule, subjects: &HashSet<String>, request: &AccessRequest) -> bool {
    subjects.contains(&rule.subject)
        && rule.domain == request.domain
        && rule.object == request.object
        && rule.action == request.action
}
