/// Role updates for a user within a tenant
///
/// Validation runs fully before a unit of work opens; the write itself is a
/// single atomic transaction. On any failure after `begin`, the unit of work
/// rolls back and the original error propagates unchanged, so a partial role
/// change is never observable.

use std::collections::BTreeSet;

use uuid::Uuid;

use rosterly_shared::models::membership::Role;
use rosterly_shared::store::{MembershipStore, UnitOfWork};

use crate::context::ServiceContext;
use crate::error::{ServiceError, ServiceResult};
use crate::user::input::{normalize_roles, parse_user_id, UpdateRolesInput};
use crate::user::rules;

/// Applies role updates to one membership
pub struct UserEditor<'a, S: MembershipStore> {
    store: &'a S,
    ctx: &'a ServiceContext,
}

impl<'a, S: MembershipStore> UserEditor<'a, S> {
    /// Creates an editor bound to a store and a request context
    pub fn new(store: &'a S, ctx: &'a ServiceContext) -> Self {
        UserEditor { store, ctx }
    }

    /// Replaces the target user's role set within the current tenant
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for missing context fields, a malformed target id,
    ///   or an absent role list (an empty list is permitted)
    /// - `PlanOwnerRevocation` when the edit would strip admin from the
    ///   plan-responsible user of an active paid plan
    /// - `SelfAdminRevocation` when the actor drops their own admin role
    /// - `MembershipNotFound` when the target has no membership here
    /// - `Store` for transactional store failures; the transaction is rolled
    ///   back and nothing is persisted
    pub async fn update_roles(&self, input: UpdateRolesInput) -> ServiceResult<()> {
        let (target_id, roles) = self.validate(input)?;

        let mut uow = self.store.begin().await?;
        match self.persist(uow.as_mut(), target_id, &roles).await {
            Ok(()) => {
                uow.commit().await?;
                tracing::info!(
                    tenant_id = %self.ctx.tenant.id,
                    user_id = %target_id,
                    roles = roles.len(),
                    "updated membership roles"
                );
                Ok(())
            }
            Err(error) => {
                if let Err(rollback_error) = uow.rollback().await {
                    tracing::warn!(
                        error = %rollback_error,
                        "rollback failed after role update error"
                    );
                }
                Err(error)
            }
        }
    }

    fn validate(&self, input: UpdateRolesInput) -> ServiceResult<(Uuid, BTreeSet<Role>)> {
        self.ctx.ensure_complete()?;

        let target_id = parse_user_id(&input.id, "id")?;
        let roles = normalize_roles(input.roles)?;

        let target_ids = BTreeSet::from([target_id]);
        if rules::is_removing_plan_user(&self.ctx.tenant, &target_ids, Some(&roles)) {
            return Err(ServiceError::PlanOwnerRevocation);
        }
        if rules::is_removing_own_admin_role(&self.ctx.actor, target_id, &roles) {
            return Err(ServiceError::SelfAdminRevocation);
        }

        Ok((target_id, roles))
    }

    async fn persist(
        &self,
        uow: &mut dyn UnitOfWork,
        target_id: Uuid,
        roles: &BTreeSet<Role>,
    ) -> ServiceResult<()> {
        let membership = uow.find_membership(self.ctx.tenant.id, target_id).await?;
        if membership.is_none() {
            return Err(ServiceError::MembershipNotFound);
        }

        uow.update_membership_roles(self.ctx.tenant.id, target_id, roles)
            .await?;
        Ok(())
    }
}
