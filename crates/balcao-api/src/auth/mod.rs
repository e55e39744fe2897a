//! Authentication and authorization core.
//!
//! One parameterized resolver serves every route group: the token is pulled
//! from the request (header first, query-string fallback, body field on one
//! legacy route), checked against the admin shared secret and then against
//! the identity providers in order. Production-strict and dev-permissive
//! resolution are distinct types selected once at startup, never a runtime
//! flag on the hot path.

pub mod jwks;
pub mod permission;
pub mod provider;
pub mod resolver;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use permission::PermissionPolicy;
pub use provider::{ProviderCheck, TokenValidator};
pub use resolver::{Authenticator, DevAuthenticator, StrictAuthenticator};

/// Subject attached to callers authenticated with the shared admin secret.
pub const ADMIN_SUBJECT: &str = "shared-admin";

/// Subject attached to the synthesized development caller.
pub const DEV_SUBJECT: &str = "dev-local";

/// Application role of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to every resource and moderation action.
    Admin,
    /// Regular authenticated account.
    User,
    /// Synthesized local-development identity.
    Dev,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Dev => "dev",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity resolved once per request and consumed by downstream handlers.
///
/// Never persisted and never cached between requests; `email` and
/// `display_name` are provider-sourced and used only for logging/display.
#[derive(Debug, Clone, Serialize)]
pub struct Caller {
    /// Opaque subject identifier (provider-issued, or a fixed literal for
    /// the admin-secret and development identities).
    pub subject: String,
    pub role: Role,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl Caller {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
            email: None,
            display_name: None,
        }
    }

    /// Caller synthesized for the shared admin secret.
    pub fn admin() -> Self {
        Self::new(ADMIN_SUBJECT, Role::Admin)
    }

    /// Caller synthesized in development mode.
    pub fn dev() -> Self {
        Self::new(DEV_SUBJECT, Role::Dev)
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub fn with_display_name(mut self, name: Option<String>) -> Self {
        self.display_name = name;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True when this caller owns the record with the given owner reference.
    pub fn owns(&self, owner: &str) -> bool {
        self.subject == owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_caller_uses_fixed_subject() {
        let caller = Caller::admin();
        assert_eq!(caller.subject, ADMIN_SUBJECT);
        assert!(caller.is_admin());
    }

    #[test]
    fn dev_caller_is_not_admin() {
        let caller = Caller::dev();
        assert_eq!(caller.subject, DEV_SUBJECT);
        assert_eq!(caller.role, Role::Dev);
        assert!(!caller.is_admin());
    }

    #[test]
    fn ownership_compares_subjects() {
        let caller = Caller::new("auth0|abc123", Role::User);
        assert!(caller.owns("auth0|abc123"));
        assert!(!caller.owns("auth0|other"));
    }
}
