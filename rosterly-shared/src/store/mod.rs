/// Transactional store adapters
///
/// The membership services never talk to the database directly. They go
/// through the traits in this module, which model a unit of work that either
/// commits as a whole or rolls back as a whole.
///
/// # Contract
///
/// All store implementations must:
/// 1. Hand out a [`UnitOfWork`] from [`MembershipStore::begin`]
/// 2. Make writes staged through a unit of work invisible until `commit`
/// 3. Discard all staged writes on `rollback`
/// 4. Serve pool-level reads independently of any open unit of work
///
/// Cross-request isolation is the backing store's responsibility; the
/// services assume at least read-committed semantics and take no in-process
/// locks.
///
/// # Implementations
///
/// - [`postgres::PgMembershipStore`]: sqlx/PostgreSQL, production
/// - [`memory::MemoryStore`]: in-process, deterministic, for tests and demos

use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::membership::{Membership, Role};
use crate::models::tenant::Tenant;
use crate::models::user::{NewUser, Provider, User};

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store refused or could not serve the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be mapped back into the domain model
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// A transaction handle covering one atomic group of mutations
///
/// Reads observe committed state; writes stage until [`commit`] and vanish
/// on [`rollback`]. Consuming `self` on both terminal methods keeps a
/// finished unit of work from being reused.
///
/// [`commit`]: UnitOfWork::commit
/// [`rollback`]: UnitOfWork::rollback
#[async_trait]
pub trait UnitOfWork: Send {
    /// Finds a membership by tenant and user
    async fn find_membership(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError>;

    /// Replaces the role set of an existing membership
    async fn update_membership_roles(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
        roles: &BTreeSet<Role>,
    ) -> Result<(), StoreError>;

    /// Removes a user's membership from a tenant
    ///
    /// Removing a membership that does not exist is a no-op.
    async fn destroy_membership(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError>;

    /// Applies every staged write atomically
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discards every staged write
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Store operations consumed by the membership services
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Opens a new unit of work
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    /// Finds a user by id, outside any unit of work
    ///
    /// Batch callers may dispatch several of these concurrently; each read is
    /// independent.
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Store operations consumed by the identity linker
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Finds the user linked to an external identity
    async fn find_user_by_identity(
        &self,
        provider: Provider,
        subject: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Finds a user by email (case-insensitive)
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Creates a new user account
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Links an external identity to a user; linking the same identity twice
    /// is a no-op
    async fn link_identity(
        &self,
        user_id: Uuid,
        provider: Provider,
        subject: &str,
    ) -> Result<(), StoreError>;

    /// Creates a tenant on the free plan with the given user as its admin
    async fn create_tenant_with_admin(
        &self,
        name: &str,
        user_id: Uuid,
    ) -> Result<Tenant, StoreError>;
}
