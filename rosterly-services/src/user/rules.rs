/// Business rules guarding membership mutations
///
/// Stateless predicates evaluated against the current tenant snapshot, the
/// acting user, and the proposed mutation before any unit of work opens.
/// A tenant on a paid plan must keep its billing-responsible user as an
/// admin member, and an actor may not strip their own last line of access.

use std::collections::BTreeSet;

use uuid::Uuid;

use rosterly_shared::models::membership::Role;
use rosterly_shared::models::tenant::Tenant;

use crate::context::Actor;

/// Whether the mutation would strip the plan-responsible user of admin
/// access or remove them outright.
///
/// `proposed_roles` is `Some` for a role edit and `None` for a removal
/// (full revocation). Protections only apply while the tenant is on a paid
/// plan that is not winding down.
pub fn is_removing_plan_user(
    tenant: &Tenant,
    target_ids: &BTreeSet<Uuid>,
    proposed_roles: Option<&BTreeSet<Role>>,
) -> bool {
    let Some(plan_user_id) = tenant.protected_plan_user() else {
        return false;
    };

    if !target_ids.contains(&plan_user_id) {
        return false;
    }

    match proposed_roles {
        Some(roles) => !roles.contains(&Role::Admin),
        None => true,
    }
}

/// Whether the actor is editing their own membership and the proposal drops
/// the admin role they currently hold.
pub fn is_removing_own_admin_role(
    actor: &Actor,
    target_id: Uuid,
    proposed_roles: &BTreeSet<Role>,
) -> bool {
    if proposed_roles.contains(&Role::Admin) {
        return false;
    }

    if actor.id != target_id {
        return false;
    }

    actor.is_admin()
}

/// Whether the actor's own id appears in a removal target set.
pub fn is_self_destruction(actor: &Actor, target_ids: &BTreeSet<Uuid>) -> bool {
    target_ids.contains(&actor.id)
}
