/// Database models for Rosterly
///
/// This module contains the domain data structures shared across the
/// services and store adapters.
///
/// # Models
///
/// - `user`: global user accounts and their external identity links
/// - `tenant`: organizations/accounts for multi-tenancy, plan and billing state
/// - `membership`: user-tenant relationships with role sets

pub mod membership;
pub mod tenant;
pub mod user;
