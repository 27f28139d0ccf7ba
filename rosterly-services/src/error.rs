/// Service error taxonomy for membership mutations
///
/// Every rejection the membership services can produce maps to exactly one
/// variant here, so callers can translate failures without string matching.
/// Each variant carries a stable kind tag and a localized message key; the
/// HTTP layer combines those with the request language to render a response.

use serde::Serialize;

use rosterly_shared::store::StoreError;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Unified error type for the membership services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required field is missing or malformed; raised before any unit of
    /// work opens
    #[error("{field} is required")]
    InvalidInput { field: &'static str },

    /// Role edit would strip admin access from the plan-responsible user
    #[error("cannot revoke the admin role of the user responsible for the plan")]
    PlanOwnerRevocation,

    /// Removal batch includes the plan-responsible user
    #[error("cannot remove the user responsible for the plan")]
    PlanOwnerRemoval,

    /// Actor attempted to drop their own admin role
    #[error("admins cannot revoke their own admin role")]
    SelfAdminRevocation,

    /// Actor attempted to remove themselves from the tenant
    #[error("users cannot remove themselves from the workspace")]
    SelfRemoval,

    /// Target membership does not exist in this tenant
    #[error("membership not found in this workspace")]
    MembershipNotFound,

    /// Target user does not exist
    #[error("user not found")]
    UserNotFound,

    /// Transactional store failure during the mutation phase
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Stable machine-readable kind tag
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput { .. } => "invalid_input",
            ServiceError::PlanOwnerRevocation => "plan_owner_revocation",
            ServiceError::PlanOwnerRemoval => "plan_owner_removal",
            ServiceError::SelfAdminRevocation => "self_admin_revocation",
            ServiceError::SelfRemoval => "self_removal",
            ServiceError::MembershipNotFound => "membership_not_found",
            ServiceError::UserNotFound => "user_not_found",
            ServiceError::Store(_) => "store_failure",
        }
    }

    /// Localized message catalog key for client-side rendering
    pub fn message_key(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput { .. } => "validation.required",
            ServiceError::PlanOwnerRevocation => "user.errors.revokingPlanUser",
            ServiceError::PlanOwnerRemoval => "user.errors.destroyingPlanUser",
            ServiceError::SelfAdminRevocation => "user.errors.revokingOwnPermission",
            ServiceError::SelfRemoval => "user.errors.destroyingHimself",
            ServiceError::MembershipNotFound => "user.errors.membershipNotFound",
            ServiceError::UserNotFound => "user.errors.userNotFound",
            ServiceError::Store(_) => "errors.internal",
        }
    }

    /// Packages the error for the transport boundary
    pub fn envelope(&self, language: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            kind: self.kind(),
            message_key: self.message_key(),
            language: language.map(str::to_string),
        }
    }
}

/// Boundary representation of a service error
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    /// Stable kind tag
    pub kind: &'static str,

    /// Localized message catalog key
    pub message_key: &'static str,

    /// Language tag for client-side rendering, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
