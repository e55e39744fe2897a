//! Permission checks over a resolved caller.
//!
//! Labels are either `admin`, the literal `SELF`, or a role label that must
//! match the caller's role exactly. ADMIN passes everything. `SELF` passes
//! for any authenticated caller and defers ownership verification to the
//! calling service.

use tracing::debug;

use crate::auth::{Caller, Role};
use crate::config::Environment;
use crate::error::{ApiError, ApiResult};

/// Label passing for any authenticated caller.
pub const LABEL_SELF: &str = "SELF";

/// Label requiring the ADMIN role.
pub const LABEL_ADMIN: &str = "admin";

/// Whether permission labels are enforced, decided once at startup.
///
/// Development runs skip the check entirely; this is an independent bypass
/// layered on top of the permissive resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionPolicy {
    Enforcing,
    Permissive,
}

impl PermissionPolicy {
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            PermissionPolicy::Enforcing
        } else {
            PermissionPolicy::Permissive
        }
    }

    /// Allow or reject a caller for the given permission label.
    pub fn require(&self, caller: &Caller, label: &str) -> ApiResult<()> {
        if matches!(self, PermissionPolicy::Permissive) {
            return Ok(());
        }

        if caller.role == Role::Admin {
            return Ok(());
        }

        if label == LABEL_SELF {
            return Ok(());
        }

        if caller.role.as_str() == label {
            return Ok(());
        }

        debug!(
            subject = %caller.subject,
            role = %caller.role,
            label = %label,
            "permission rejected"
        );
        Err(ApiError::forbidden(format!("permission '{label}' required")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enforcing() -> PermissionPolicy {
        PermissionPolicy::Enforcing
    }

    #[test]
    fn admin_passes_every_label() {
        let caller = Caller::admin();
        assert!(enforcing().require(&caller, LABEL_ADMIN).is_ok());
        assert!(enforcing().require(&caller, LABEL_SELF).is_ok());
        assert!(enforcing().require(&caller, "delete:empresas").is_ok());
    }

    #[test]
    fn self_label_passes_any_authenticated_caller() {
        let caller = Caller::new("gotrue|u1", Role::User);
        assert!(enforcing().require(&caller, LABEL_SELF).is_ok());
    }

    #[test]
    fn role_label_requires_exact_match() {
        let caller = Caller::new("gotrue|u1", Role::User);
        assert!(enforcing().require(&caller, "user").is_ok());
        assert!(enforcing().require(&caller, LABEL_ADMIN).is_err());
        assert!(enforcing().require(&caller, "create:empresas").is_err());
    }

    #[test]
    fn permissive_policy_skips_the_check() {
        let caller = Caller::new("gotrue|u1", Role::User);
        let policy = PermissionPolicy::Permissive;
        assert!(policy.require(&caller, LABEL_ADMIN).is_ok());
        assert!(policy.require(&caller, "whatever").is_ok());
    }

    #[test]
    fn policy_follows_environment() {
        assert_eq!(
            PermissionPolicy::for_environment(Environment::Production),
            PermissionPolicy::Enforcing
        );
        assert_eq!(
            PermissionPolicy::for_environment(Environment::Development),
            PermissionPolicy::Permissive
        );
    }
}
