//! The uniform ownership gate applied to resource mutations.
//!
//! Fetch by primary key happens in the calling service; this module only
//! decides what an already-fetched record's owner field means for the
//! caller. Admins get full access; owners get access with moderation
//! fields stripped from their payloads (each patch type knows which).

use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};

/// Level of access granted to a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerAccess {
    /// ADMIN caller: no field restrictions.
    Admin,
    /// The caller owns the record: moderation fields are dropped.
    Owner,
}

/// Allow or reject a mutation on a record with the given owner reference.
pub fn authorize_owner(caller: &Caller, owner: &str) -> ApiResult<OwnerAccess> {
    if caller.is_admin() {
        return Ok(OwnerAccess::Admin);
    }
    if caller.owns(owner) {
        return Ok(OwnerAccess::Owner);
    }
    Err(ApiError::forbidden("you do not own this resource"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn admin_bypasses_ownership() {
        let access = authorize_owner(&Caller::admin(), "gotrue|someone").unwrap();
        assert_eq!(access, OwnerAccess::Admin);
    }

    #[test]
    fn owner_gets_restricted_access() {
        let caller = Caller::new("gotrue|u1", Role::User);
        let access = authorize_owner(&caller, "gotrue|u1").unwrap();
        assert_eq!(access, OwnerAccess::Owner);
    }

    #[test]
    fn stranger_is_forbidden() {
        let caller = Caller::new("gotrue|u1", Role::User);
        let err = authorize_owner(&caller, "gotrue|u2").unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
