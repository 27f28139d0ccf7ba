/// Bulk removal of users from a tenant
///
/// A removal request covers one or many users and is all-or-nothing: every
/// target must resolve to an existing user and every membership removal must
/// succeed, or the whole batch rolls back. Target lookups are independent
/// reads and run concurrently; all of them complete before the first write.

use std::collections::BTreeSet;

use futures::future::try_join_all;
use uuid::Uuid;

use rosterly_shared::store::{MembershipStore, UnitOfWork};

use crate::context::ServiceContext;
use crate::error::{ServiceError, ServiceResult};
use crate::user::input::{normalize_ids, RemoveUsersInput};
use crate::user::rules;

/// Removes users from the current tenant
pub struct UserDestroyer<'a, S: MembershipStore> {
    store: &'a S,
    ctx: &'a ServiceContext,
}

impl<'a, S: MembershipStore> UserDestroyer<'a, S> {
    /// Creates a destroyer bound to a store and a request context
    pub fn new(store: &'a S, ctx: &'a ServiceContext) -> Self {
        UserDestroyer { store, ctx }
    }

    /// Removes every target user's membership from the current tenant
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for missing context fields or an empty/malformed
    ///   target list
    /// - `PlanOwnerRemoval` when the batch includes the plan-responsible
    ///   user of an active paid plan
    /// - `SelfRemoval` when the actor targets themselves
    /// - `UserNotFound` when any target id does not resolve; no membership
    ///   in the batch is removed
    /// - `Store` for transactional store failures; the whole batch rolls
    ///   back
    pub async fn remove_users(&self, input: RemoveUsersInput) -> ServiceResult<()> {
        let target_ids = self.validate(input)?;

        let mut uow = self.store.begin().await?;
        match self.destroy_all(uow.as_mut(), &target_ids).await {
            Ok(()) => {
                uow.commit().await?;
                tracing::info!(
                    tenant_id = %self.ctx.tenant.id,
                    removed = target_ids.len(),
                    "removed users from tenant"
                );
                Ok(())
            }
            Err(error) => {
                if let Err(rollback_error) = uow.rollback().await {
                    tracing::warn!(
                        error = %rollback_error,
                        "rollback failed after removal error"
                    );
                }
                Err(error)
            }
        }
    }

    fn validate(&self, input: RemoveUsersInput) -> ServiceResult<BTreeSet<Uuid>> {
        self.ctx.ensure_complete()?;

        let target_ids = normalize_ids(input.ids)?;

        if rules::is_removing_plan_user(&self.ctx.tenant, &target_ids, None) {
            return Err(ServiceError::PlanOwnerRemoval);
        }
        if rules::is_self_destruction(&self.ctx.actor, &target_ids) {
            return Err(ServiceError::SelfRemoval);
        }

        Ok(target_ids)
    }

    async fn destroy_all(
        &self,
        uow: &mut dyn UnitOfWork,
        target_ids: &BTreeSet<Uuid>,
    ) -> ServiceResult<()> {
        // Independent reads, dispatched concurrently; all must land before
        // the first write
        let users = try_join_all(target_ids.iter().map(|id| self.store.find_user(*id))).await?;

        if users.iter().any(Option::is_none) {
            return Err(ServiceError::UserNotFound);
        }

        for target_id in target_ids {
            uow.destroy_membership(self.ctx.tenant.id, *target_id).await?;
        }
        Ok(())
    }
}
