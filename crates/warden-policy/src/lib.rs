//! Domain-scoped role-based access control.
//!
//! # Purpose
//! Stores permission and grouping rules, resolves role hierarchies inside a
//! domain, decides access requests, and manages role assignments.
//!
//! # How it fits
//! `policyd` wraps a [`PolicyService`] behind HTTP. Other embedders can build
//! a service directly from any [`PolicyAdapter`].
//!
//! # Key invariants
//! - Every operation reloads the persisted policy first, so edits made by
//!   other processes are visible on the next call.
//! - Deny overrides allow; a request matching no rule is denied.
//! - Roles never leak across domains.
//!
//! # Examples
//! ```rust
//! use warden_policy::{AccessRequest, GroupingRule, PermissionRule, PolicySnapshot, decide};
//!
//! let snapshot = PolicySnapshot::new(
//!     vec![PermissionRule::allow("owner", "teamX", "repo1", "write")],
//!     vec![GroupingRule::new("alice", "owner", "teamX")],
//! );
//! let decision = decide(&snapshot, &AccessRequest::new("alice", "teamX", "repo1", "write"));
//! assert!(decision.allowed);
//! ```
//!
//! # Common pitfalls
//! - The role whitelist is advisory; the engine accepts any role string.
//! - Concurrent writers in separate processes are last-writer-wins.

pub mod adapter;
mod assignment;
mod enforcer;
mod errors;
mod model;
mod model_conf;
mod roles;
mod rule_store;
mod service;
mod whitelist;

pub use adapter::PolicyAdapter;
pub use adapter::file::{FileAdapter, parse_policy, render_policy};
pub use adapter::memory::MemoryAdapter;
pub use adapter::postgres::{PostgresAdapter, PostgresSettings};
pub use enforcer::{decide, effective_subjects};
pub use errors::{AssignError, EngineError, StoreError, StoreResult, ValidationError};
pub use model::{AccessRequest, Decision, DecisionReason, Effect, GroupingRule, PermissionRule};
pub use model_conf::MODEL_CONF;
pub use roles::RoleResolver;
pub use rule_store::{PolicySnapshot, RuleStore};
pub use service::PolicyService;
pub use whitelist::{DEFAULT_ASSIGNABLE_ROLES, RoleWhitelist};
