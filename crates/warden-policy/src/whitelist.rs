use crate::errors::ValidationError;

pub const DEFAULT_ASSIGNABLE_ROLES: [&str; 2] = ["owner", "moderator"];

/// Roles a caller may hand out through assignment operations.
///
/// The engine itself accepts any role string; callers check the whitelist
/// before invoking `assign_role` or `replace_role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleWhitelist {
    roles: Vec<String>,
}

impl RoleWhitelist {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for role in roles {
            let role = role.into();
            if !role.is_empty() && !unique.contains(&role) {
                unique.push(role);
            }
        }
        Self { roles: unique }
    }

    pub fn validate(&self, role: &str) -> Result<(), ValidationError> {
        if self.roles.iter().any(|allowed| allowed == role) {
            return Ok(());
        }
        Err(ValidationError::RoleNotAllowed {
            role: role.to_string(),
            allowed: self.roles.clone(),
        })
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}

impl Default for RoleWhitelist {
    fn default() -> Self {
        Self::new(DEFAULT_ASSIGNABLE_ROLES)
    }
}
