/// PostgreSQL store adapter
///
/// Production implementation of the store traits on top of sqlx. A unit of
/// work maps directly to a database transaction checked out from the pool;
/// pool-level reads run on their own connections and can be dispatched
/// concurrently.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::membership::{Membership, Role};
use crate::models::tenant::{PlanStatus, PlanTier, Tenant};
use crate::models::user::{NewUser, Provider, User};
use crate::store::{IdentityStore, MembershipStore, StoreError, UnitOfWork};

const USER_COLUMNS: &str =
    "id, email, email_verified, password_hash, first_name, last_name, created_at, updated_at";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgMembershipStore {
    pool: PgPool,
}

impl PgMembershipStore {
    /// Creates a store on top of an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        PgMembershipStore { pool }
    }
}

/// Raw membership row; roles arrive as a TEXT[] column
#[derive(sqlx::FromRow)]
struct MembershipRow {
    tenant_id: Uuid,
    user_id: Uuid,
    roles: Vec<String>,
    created_at: DateTime<Utc>,
}

impl MembershipRow {
    fn into_membership(self) -> Result<Membership, StoreError> {
        let mut roles = BTreeSet::new();
        for raw in &self.roles {
            let role = Role::from_str(raw).ok_or_else(|| {
                StoreError::Corrupt(format!("unknown role '{}' on membership", raw))
            })?;
            roles.insert(role);
        }
        Ok(Membership {
            tenant_id: self.tenant_id,
            user_id: self.user_id,
            roles,
            created_at: self.created_at,
        })
    }
}

/// Raw tenant row; plan fields arrive as strings
#[derive(sqlx::FromRow)]
struct TenantRow {
    id: Uuid,
    name: String,
    plan: String,
    plan_status: String,
    plan_user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self) -> Result<Tenant, StoreError> {
        let plan = PlanTier::from_str(&self.plan)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown plan '{}'", self.plan)))?;
        let plan_status = PlanStatus::from_str(&self.plan_status).ok_or_else(|| {
            StoreError::Corrupt(format!("unknown plan status '{}'", self.plan_status))
        })?;
        Ok(Tenant {
            id: self.id,
            name: self.name,
            plan,
            plan_status,
            plan_user_id: self.plan_user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn roles_to_vec(roles: &BTreeSet<Role>) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_string()).collect()
}

/// One database transaction
pub struct PgUnitOfWork {
    txn: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_membership(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT tenant_id, user_id, roles, created_at
            FROM tenant_memberships
            WHERE tenant_id = $1 AND user_id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .fetch_optional(&mut *self.txn)
        .await?;

        row.map(MembershipRow::into_membership).transpose()
    }

    async fn update_membership_roles(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
        roles: &BTreeSet<Role>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE tenant_memberships
            SET roles = $3
            WHERE tenant_id = $1 AND user_id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(roles_to_vec(roles))
        .execute(&mut *self.txn)
        .await?;

        Ok(())
    }

    async fn destroy_membership(
        &mut self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tenant_memberships WHERE tenant_id = $1 AND user_id = $2")
            .bind(tenant_id)
            .bind(user_id)
            .execute(&mut *self.txn)
            .await?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let txn = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { txn }))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl IdentityStore for PgMembershipStore {
    async fn find_user_by_identity(
        &self,
        provider: Provider,
        subject: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {}
            FROM users u
            INNER JOIN user_identities i ON i.user_id = u.id
            WHERE i.provider = $1 AND i.subject = $2
            "#,
            user_columns_qualified()
        ))
        .bind(provider.as_str())
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        // CITEXT makes the comparison case-insensitive
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, email_verified, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.email)
        .bind(user.email_verified)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn link_identity(
        &self,
        user_id: Uuid,
        provider: Provider,
        subject: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_identities (user_id, provider, subject)
            VALUES ($1, $2, $3)
            ON CONFLICT (provider, subject) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(provider.as_str())
        .bind(subject)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_tenant_with_admin(
        &self,
        name: &str,
        user_id: Uuid,
    ) -> Result<Tenant, StoreError> {
        let mut txn = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TenantRow>(
            r#"
            INSERT INTO tenants (name, plan, plan_status)
            VALUES ($1, 'free', 'active')
            RETURNING id, name, plan, plan_status, plan_user_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&mut *txn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO tenant_memberships (tenant_id, user_id, roles)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(row.id)
        .bind(user_id)
        .bind(vec![Role::Admin.as_str().to_string()])
        .execute(&mut *txn)
        .await?;

        txn.commit().await?;

        row.into_tenant()
    }
}

fn user_columns_qualified() -> String {
    USER_COLUMNS
        .split(", ")
        .map(|col| format!("u.{}", col))
        .collect::<Vec<_>>()
        .join(", ")
}
