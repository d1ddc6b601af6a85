//! Role hierarchy resolution over grouping rules.
//!
//! # Purpose
//! Computes the transitive closure of the grouping relation inside one
//! domain: every role a subject holds (directly or through role-of-role
//! edges), and the inverse, every subject that holds a role.
//!
//! # Key invariants
//! - Only edges whose domain equals the query domain are followed.
//! - Traversal is breadth-first with a visited set; cycles terminate.
//! - The start node is reported only when a cycle leads back to it.
//! - Results are distinct and in discovery order.
use crate::model::GroupingRule;
use std::collections::{HashMap, HashSet, VecDeque};

/// Borrowing view over a set of grouping rules.
#[derive(Debug, Clone, Copy)]
pub struct RoleResolver<'a> {
    groupings: &'a [GroupingRule],
}

impl<'a> RoleResolver<'a> {
    pub fn new(groupings: &'a [GroupingRule]) -> Self {
        Self { groupings }
    }

    /// Every role reachable from `subject` within `domain`.
    pub fn roles_of(&self, subject: &str, domain: &str) -> Vec<String> {
        self.reachable(subject, domain, |rule| (&rule.subject, &rule.role))
    }

    /// Every subject from which `role` is reachable within `domain`.
    pub fn subjects_of(&self, role: &str, domain: &str) -> Vec<String> {
        self.reachable(role, domain, |rule| (&rule.role, &rule.subject))
    }

    fn reachable<F>(&self, start: &str, domain: &str, edge: F) -> Vec<String>
    where
        F: Fn(&'a GroupingRule) -> (&'a String, &'a String),
    {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for rule in self.groupings.iter().filter(|rule| rule.domain == domain) {
            let (from, to) = edge(rule);
            adjacency.entry(from.as_str()).or_default().push(to.as_str());
        }

        let mut expanded: HashSet<&str> = HashSet::from([start]);
        let mut seen: HashSet<&str> = HashSet::new();
        let mut found = Vec::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            let Some(next) = adjacency.get(node) else {
                continue;
            };
            for &neighbor in next {
                if seen.insert(neighbor) {
                    found.push(neighbor.to_string());
                }
                if expanded.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        found
    }
}
