//! Policy rule, assignment, and decision types.
//!
//! # Purpose
//! Defines the record shapes shared by the rule store, the persistence
//! adapters, the enforcement engine, and the HTTP API.
//!
//! # Key invariants
//! - Rules are plain string tuples; field order is part of the persisted
//!   contract (`to_fields` returns it).
//! - A [`Decision`] is transient and never persisted.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "allow",
            Effect::Deny => "deny",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "allow" => Ok(Effect::Allow),
            "deny" => Ok(Effect::Deny),
            other => Err(format!("unknown effect: {other}")),
        }
    }
}

/// `(subject-or-role, domain, object, action, effect)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PermissionRule {
    pub subject: String,
    pub domain: String,
    pub object: String,
    pub action: String,
    pub effect: Effect,
}

impl PermissionRule {
    pub fn new(
        subject: impl Into<String>,
        domain: impl Into<String>,
        object: impl Into<String>,
        action: impl Into<String>,
        effect: Effect,
    ) -> Self {
        Self {
            subject: subject.into(),
            domain: domain.into(),
            object: object.into(),
            action: action.into(),
            effect,
        }
    }

    pub fn allow(
        subject: impl Into<String>,
        domain: impl Into<String>,
        object: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::new(subject, domain, object, action, Effect::Allow)
    }

    pub fn deny(
        subject: impl Into<String>,
        domain: impl Into<String>,
        object: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::new(subject, domain, object, action, Effect::Deny)
    }

    /// Fields in persisted order: subject, domain, object, action, effect.
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.subject.clone(),
            self.domain.clone(),
            self.object.clone(),
            self.action.clone(),
            self.effect.to_string(),
        ]
    }
}

/// Role assignment edge: `subject` holds `role` within `domain`.
///
/// `role` may itself appear as the `subject` of another rule, which models
/// role inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct GroupingRule {
    pub subject: String,
    pub role: String,
    pub domain: String,
}

impl GroupingRule {
    pub fn new(
        subject: impl Into<String>,
        role: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            role: role.into(),
            domain: domain.into(),
        }
    }

    /// Fields in persisted order: subject, role, domain.
    pub fn to_fields(&self) -> Vec<String> {
        vec![self.subject.clone(), self.role.clone(), self.domain.clone()]
    }

    pub(crate) fn is_for(&self, subject: &str, domain: &str) -> bool {
        self.subject == subject && self.domain == domain
    }
}

/// A single authorization question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessRequest {
    pub subject: String,
    pub domain: String,
    pub object: String,
    pub action: String,
}

impl AccessRequest {
    pub fn new(
        subject: impl Into<String>,
        domain: impl Into<String>,
        object: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            domain: domain.into(),
            object: object.into(),
            action: action.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// At least one allow rule matched and no deny rule did.
    Allowed,
    /// A deny rule matched; it overrides every allow.
    ExplicitDeny,
    /// Nothing matched; default deny.
    NoMatch,
}

/// Outcome of one enforcement call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Decision {
    pub allowed: bool,
    pub reason: DecisionReason,
    /// The rule that decided the outcome, `None` for a default deny.
    pub matched: Option<PermissionRule>,
}

impl Decision {
    pub(crate) fn allow(rule: PermissionRule) -> Self {
        Self {
            allowed: true,
            reason: DecisionReason::Allowed,
            matched: Some(rule),
        }
    }

    pub(crate) fn explicit_deny(rule: PermissionRule) -> Self {
        Self {
            allowed: false,
            reason: DecisionReason::ExplicitDeny,
            matched: Some(rule),
        }
    }

    pub(crate) fn no_match() -> Self {
        Self {
            allowed: false,
            reason: DecisionReason::NoMatch,
            matched: None,
        }
    }

    /// Matched rule as persisted fields, empty when nothing matched.
    pub fn explanation(&self) -> Vec<String> {
        self.matched
            .as_ref()
            .map(PermissionRule::to_fields)
            .unwrap_or_default()
    }
}
