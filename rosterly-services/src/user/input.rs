/// Boundary input types for membership mutations
///
/// Requests may carry a single identifier or a collection; both shapes
/// normalize into one canonical deduplicated set before any business logic
/// runs. Role lists normalize the same way, with unknown role names rejected
/// at this boundary instead of compared as strings deeper in.

use std::collections::BTreeSet;

use serde::Deserialize;
use uuid::Uuid;

use rosterly_shared::models::membership::Role;

use crate::error::ServiceError;

/// A value that may arrive as a scalar or as a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Collapses both shapes into a vector
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

/// Input for a role update on one user
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRolesInput {
    /// Target user id
    pub id: String,

    /// Proposed role set; an empty list demotes to no explicit role, but the
    /// field itself must be present
    pub roles: Option<OneOrMany<String>>,
}

/// Input for removing users from the tenant
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveUsersInput {
    /// Target user ids; a single id or a collection
    pub ids: OneOrMany<String>,
}

/// Parses one user id, trimming surrounding whitespace
pub fn parse_user_id(raw: &str, field: &'static str) -> Result<Uuid, ServiceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput { field });
    }
    let id = Uuid::parse_str(trimmed).map_err(|_| ServiceError::InvalidInput { field })?;
    if id.is_nil() {
        return Err(ServiceError::InvalidInput { field });
    }
    Ok(id)
}

/// Normalizes a removal target list into a non-empty deduplicated id set
pub fn normalize_ids(input: OneOrMany<String>) -> Result<BTreeSet<Uuid>, ServiceError> {
    let mut ids = BTreeSet::new();
    for raw in input.into_vec() {
        ids.insert(parse_user_id(&raw, "ids")?);
    }
    if ids.is_empty() {
        return Err(ServiceError::InvalidInput { field: "ids" });
    }
    Ok(ids)
}

/// Normalizes a proposed role list into a deduplicated role set
///
/// `None` means the field was absent, which is an error; `Some` with an
/// empty list is a valid empty set.
pub fn normalize_roles(input: Option<OneOrMany<String>>) -> Result<BTreeSet<Role>, ServiceError> {
    let input = input.ok_or(ServiceError::InvalidInput { field: "roles" })?;

    let mut roles = BTreeSet::new();
    for raw in input.into_vec() {
        let role = Role::from_str(raw.trim())
            .ok_or(ServiceError::InvalidInput { field: "roles" })?;
        roles.insert(role);
    }
    Ok(roles)
}
