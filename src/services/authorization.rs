//! Role-and-scope authorization for read-model calls.
//!
//! Checked before any aggregation query runs.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::dashboard::MetricScope;
use crate::models::user::UserRole;

/// The authenticated identity a call is made on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requestor {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AppError::Forbidden(reason.to_string())),
        }
    }
}

/// Decide whether `requestor` may read aggregated data for `scope`.
///
/// Admins may read any scope. Students may only read their own user scope.
pub fn authorize(requestor: &Requestor, scope: &MetricScope) -> Decision {
    if requestor.role.is_elevated() {
        return Decision::Allow;
    }
    match scope {
        MetricScope::User(user_id) if *user_id == requestor.user_id => Decision::Allow,
        MetricScope::User(_) => Decision::Deny("Students may only view their own data"),
        MetricScope::ProviderPlatform(_) | MetricScope::All => {
            Decision::Deny("Admin access required")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Requestor {
        Requestor {
            user_id: Uuid::from_u128(4),
            role: UserRole::Student,
        }
    }

    fn admin() -> Requestor {
        Requestor {
            user_id: Uuid::from_u128(1),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn student_may_view_own_scope() {
        let me = student();
        assert_eq!(authorize(&me, &MetricScope::User(me.user_id)), Decision::Allow);
    }

    #[test]
    fn student_denied_other_users() {
        let decision = authorize(&student(), &MetricScope::User(Uuid::from_u128(5)));
        assert!(!decision.is_allowed());
        assert!(decision.into_result().unwrap_err().is_forbidden());
    }

    #[test]
    fn student_denied_platform_scopes() {
        assert!(!authorize(&student(), &MetricScope::All).is_allowed());
        assert!(!authorize(&student(), &MetricScope::ProviderPlatform(Uuid::nil())).is_allowed());
    }

    #[test]
    fn admin_allowed_everywhere() {
        let a = admin();
        for scope in [
            MetricScope::User(Uuid::from_u128(4)),
            MetricScope::ProviderPlatform(Uuid::nil()),
            MetricScope::All,
        ] {
            assert!(authorize(&a, &scope).is_allowed());
        }
    }
}
