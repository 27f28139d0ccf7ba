/// Membership model for user-tenant relationships
///
/// A membership records which roles a user holds within a specific tenant.
/// It implements a many-to-many relationship between users and tenants; the
/// role set may be empty, which leaves the user a member with no explicit
/// role.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tenant_memberships (
///     tenant_id UUID NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     roles TEXT[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (tenant_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **admin**: manage users, roles, and tenant settings
/// - **member**: work with assignments inside the tenant
///
/// Roles are held as an ordered set: duplicates collapse and iteration order
/// is stable.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles a user can hold within a tenant
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can manage users, roles, and tenant settings
    Admin,

    /// Can work with assignments inside the tenant
    Member,
}

impl Role {
    /// Converts role to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    /// Parses role from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }
}

/// Membership model representing a user-tenant relationship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    /// Tenant ID
    pub tenant_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Roles held within the tenant (ordered, deduplicated, may be empty)
    pub roles: BTreeSet<Role>,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// Creates a membership from any iterator of roles, collapsing duplicates
    pub fn new(tenant_id: Uuid, user_id: Uuid, roles: impl IntoIterator<Item = Role>) -> Self {
        Membership {
            tenant_id,
            user_id,
            roles: roles.into_iter().collect(),
            created_at: Utc::now(),
        }
    }

    /// Whether the membership grants admin access
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::from_str(Role::Admin.as_str()), Some(Role::Admin));
        assert_eq!(Role::from_str(Role::Member.as_str()), Some(Role::Member));
        assert_eq!(Role::from_str("owner"), None);
        assert_eq!(Role::from_str("Admin"), None);
    }

    #[test]
    fn test_duplicate_roles_collapse() {
        let membership = Membership::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            [Role::Admin, Role::Admin, Role::Member],
        );
        assert_eq!(membership.roles.len(), 2);
        assert!(membership.is_admin());
    }

    #[test]
    fn test_empty_role_set_is_valid() {
        let membership = Membership::new(Uuid::new_v4(), Uuid::new_v4(), []);
        assert!(membership.roles.is_empty());
        assert!(!membership.is_admin());
    }
}
