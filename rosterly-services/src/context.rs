/// Request-scoped service context
///
/// The upstream authentication layer resolves the current tenant, the acting
/// user, and the request language before a mutation reaches the services.
/// The context is trusted for session legitimacy only; tenant-level business
/// rules are re-checked by the services themselves.

use std::collections::BTreeSet;

use uuid::Uuid;

use rosterly_shared::models::membership::Role;
use rosterly_shared::models::tenant::Tenant;

use crate::error::ServiceError;

/// The authenticated user performing a mutation
///
/// `roles` holds the actor's roles within the current tenant, resolved
/// upstream together with the session.
#[derive(Debug, Clone)]
pub struct Actor {
    /// User id
    pub id: Uuid,

    /// User email
    pub email: String,

    /// Roles held within the current tenant
    pub roles: BTreeSet<Role>,
}

impl Actor {
    /// Creates an actor from any iterator of roles
    pub fn new(id: Uuid, email: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Actor {
            id,
            email: email.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Whether the actor holds admin in the current tenant
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// Everything a service invocation needs besides its own input
#[derive(Debug, Clone)]
pub struct ServiceContext {
    /// Snapshot of the current tenant
    pub tenant: Tenant,

    /// The acting user
    pub actor: Actor,

    /// Request language tag (e.g. "en", "pt-BR")
    pub language: String,
}

impl ServiceContext {
    /// Creates a context
    pub fn new(tenant: Tenant, actor: Actor, language: impl Into<String>) -> Self {
        ServiceContext {
            tenant,
            actor,
            language: language.into(),
        }
    }

    /// Verifies the identifying fields every mutation requires
    ///
    /// Nil UUIDs and blank emails count as absent.
    pub fn ensure_complete(&self) -> Result<(), ServiceError> {
        if self.tenant.id.is_nil() {
            return Err(ServiceError::InvalidInput { field: "tenantId" });
        }
        if self.actor.id.is_nil() {
            return Err(ServiceError::InvalidInput {
                field: "currentUser.id",
            });
        }
        if self.actor.email.trim().is_empty() {
            return Err(ServiceError::InvalidInput {
                field: "currentUser.email",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rosterly_shared::models::tenant::{PlanStatus, PlanTier};

    fn tenant(id: Uuid) -> Tenant {
        Tenant {
            id,
            name: "Acme Staffing".to_string(),
            plan: PlanTier::Free,
            plan_status: PlanStatus::Active,
            plan_user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ensure_complete_accepts_valid_context() {
        let ctx = ServiceContext::new(
            tenant(Uuid::new_v4()),
            Actor::new(Uuid::new_v4(), "admin@example.com", [Role::Admin]),
            "en",
        );
        assert!(ctx.ensure_complete().is_ok());
    }

    #[test]
    fn test_ensure_complete_rejects_nil_tenant() {
        let ctx = ServiceContext::new(
            tenant(Uuid::nil()),
            Actor::new(Uuid::new_v4(), "admin@example.com", [Role::Admin]),
            "en",
        );
        assert!(matches!(
            ctx.ensure_complete(),
            Err(ServiceError::InvalidInput { field: "tenantId" })
        ));
    }

    #[test]
    fn test_ensure_complete_rejects_blank_email() {
        let ctx = ServiceContext::new(
            tenant(Uuid::new_v4()),
            Actor::new(Uuid::new_v4(), "   ", [Role::Admin]),
            "en",
        );
        assert!(matches!(
            ctx.ensure_complete(),
            Err(ServiceError::InvalidInput {
                field: "currentUser.email"
            })
        ));
    }

    #[test]
    fn test_actor_is_admin() {
        let admin = Actor::new(Uuid::new_v4(), "a@example.com", [Role::Admin, Role::Member]);
        assert!(admin.is_admin());

        let member = Actor::new(Uuid::new_v4(), "m@example.com", [Role::Member]);
        assert!(!member.is_admin());
    }
}
