/// In-memory store for testing and demos
///
/// This adapter keeps the whole store in process memory and reproduces the
/// transactional contract of the PostgreSQL adapter: writes staged through a
/// unit of work apply atomically on commit and vanish on rollback.
///
/// It is useful for:
/// - Exercising the membership services without a database
/// - Proving rollback behavior deterministically
/// - Simulating store failures mid-transaction
///
/// # Failure injection
///
/// ```
/// use rosterly_shared::store::memory::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.fail_writes(true); // every staged write now errors
/// ```

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::membership::{Membership, Role};
use crate::models::tenant::{PlanStatus, PlanTier, Tenant};
use crate::models::user::{NewUser, Provider, User};
use crate::store::{IdentityStore, MembershipStore, StoreError, UnitOfWork};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    tenants: HashMap<Uuid, Tenant>,
    memberships: HashMap<(Uuid, Uuid), Membership>,
    identities: HashMap<(Provider, String), Uuid>,
}

/// In-process store with staged, atomic writes
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent staged write fail, to exercise rollback paths
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seeds a user
    pub fn insert_user(&self, user: User) {
        self.state.lock().unwrap().users.insert(user.id, user);
    }

    /// Seeds a tenant
    pub fn insert_tenant(&self, tenant: Tenant) {
        self.state.lock().unwrap().tenants.insert(tenant.id, tenant);
    }

    /// Seeds a membership
    pub fn insert_membership(&self, membership: Membership) {
        self.state
            .lock()
            .unwrap()
            .memberships
            .insert((membership.tenant_id, membership.user_id), membership);
    }

    /// Committed role set for a membership, if present
    pub fn membership_roles(&self, tenant_id: Uuid, user_id: Uuid) -> Option<BTreeSet<Role>> {
        self.state
            .lock()
            .unwrap()
            .memberships
            .get(&(tenant_id, user_id))
            .map(|m| m.roles.clone())
    }

    /// Whether a committed membership exists
    pub fn has_membership(&self, tenant_id: Uuid, user_id: Uuid) -> bool {
        self.state
            .lock()
            .unwrap()
            .memberships
            .contains_key(&(tenant_id, user_id))
    }

    /// Committed memberships for a user across all tenants
    pub fn memberships_of(&self, user_id: Uuid) -> Vec<Membership> {
        self.state
            .lock()
            .unwrap()
            .memberships
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect()
    }
}

enum StagedWrite {
    UpdateRoles {
        tenant_id: Uuid,
        user_id: Uuid,
        roles: BTreeSet<Role>,
    },
    DestroyMembership {
        tenant_id: Uuid,
        user_id: Uuid,
    },
}

/// Unit of work over the in-memory state
pub struct MemoryUnitOfWork {
    state: Arc<Mutex<MemoryState>>,
    fail_writes: Arc<AtomicBool>,
    staged: Vec<StagedWrite>,
}

impl MemoryUnitOfWork {
    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_membership(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .memberships
            .get(&(tenant_id, user_id))
            .cloned())
    }

    async fn update_membership_roles(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
        roles: &BTreeSet<Role>,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        self.staged.push(StagedWrite::UpdateRoles {
            tenant_id,
            user_id,
            roles: roles.clone(),
        });
        Ok(())
    }

    async fn destroy_membership(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        self.staged
            .push(StagedWrite::DestroyMembership { tenant_id, user_id });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUnitOfWork { state, staged, .. } = *self;
        let mut state = state.lock().unwrap();
        for write in staged {
            match write {
                StagedWrite::UpdateRoles {
                    tenant_id,
                    user_id,
                    roles,
                } => {
                    if let Some(membership) = state.memberships.get_mut(&(tenant_id, user_id)) {
                        membership.roles = roles;
                    }
                }
                StagedWrite::DestroyMembership { tenant_id, user_id } => {
                    state.memberships.remove(&(tenant_id, user_id));
                }
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        // Staged writes are simply dropped
        Ok(())
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        Ok(Box::new(MemoryUnitOfWork {
            state: Arc::clone(&self.state),
            fail_writes: Arc::clone(&self.fail_writes),
            staged: Vec::new(),
        }))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.lock().unwrap().users.get(&id).cloned())
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_user_by_identity(
        &self,
        provider: Provider,
        subject: &str,
    ) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().unwrap();
        let user_id = state.identities.get(&(provider, subject.to_string()));
        Ok(user_id.and_then(|id| state.users.get(id)).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            email_verified: user.email_verified,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .users
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn link_identity(
        &self,
        user_id: Uuid,
        provider: Provider,
        subject: &str,
    ) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .identities
            .entry((provider, subject.to_string()))
            .or_insert(user_id);
        Ok(())
    }

    async fn create_tenant_with_admin(
        &self,
        name: &str,
        user_id: Uuid,
    ) -> Result<Tenant, StoreError> {
        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            plan: PlanTier::Free,
            plan_status: PlanStatus::Active,
            plan_user_id: None,
            created_at: now,
            updated_at: now,
        };

        let mut state = self.state.lock().unwrap();
        state.tenants.insert(tenant.id, tenant.clone());
        state.memberships.insert(
            (tenant.id, user_id),
            Membership::new(tenant.id, user_id, [Role::Admin]),
        );
        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(tenant_id: Uuid, user_id: Uuid, roles: impl IntoIterator<Item = Role>) -> Membership {
        Membership::new(tenant_id, user_id, roles)
    }

    #[tokio::test]
    async fn test_commit_applies_staged_writes() {
        let store = MemoryStore::new();
        let tenant_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        store.insert_membership(membership(tenant_id, user_id, [Role::Member]));

        let mut uow = store.begin().await.unwrap();
        let roles: BTreeSet<Role> = [Role::Admin].into_iter().collect();
        uow.update_membership_roles(tenant_id, user_id, &roles)
            .await
            .unwrap();

        // Staged but not yet visible
        assert_eq!(
            store.membership_roles(tenant_id, user_id).unwrap(),
            [Role::Member].into_iter().collect()
        );

        uow.commit().await.unwrap();
        assert_eq!(store.membership_roles(tenant_id, user_id).unwrap(), roles);
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let store = MemoryStore::new();
        let tenant_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        store.insert_membership(membership(tenant_id, user_id, [Role::Member]));

        let mut uow = store.begin().await.unwrap();
        uow.destroy_membership(tenant_id, user_id).await.unwrap();
        uow.rollback().await.unwrap();

        assert!(store.has_membership(tenant_id, user_id));
    }

    #[tokio::test]
    async fn test_fail_writes_blocks_staging() {
        let store = MemoryStore::new();
        store.fail_writes(true);

        let mut uow = store.begin().await.unwrap();
        let result = uow
            .destroy_membership(Uuid::new_v4(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_identity_lookup_and_link() {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                email: "casey@example.com".to_string(),
                email_verified: true,
                password_hash: None,
                first_name: Some("Casey".to_string()),
                last_name: None,
            })
            .await
            .unwrap();

        store
            .link_identity(user.id, Provider::Google, "sub-123")
            .await
            .unwrap();

        let found = store
            .find_user_by_identity(Provider::Google, "sub-123")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        // Email lookup is case-insensitive
        let found = store.find_user_by_email("CASEY@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }
}
