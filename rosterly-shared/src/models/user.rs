/// User model and external identity links
///
/// Users are global accounts that can belong to multiple tenants via
/// memberships. Accounts created through social sign-in carry no password
/// hash; they authenticate through a linked external identity instead.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     email_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     password_hash VARCHAR(255),
///     first_name VARCHAR(255),
///     last_name VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE user_identities (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     provider VARCHAR(50) NOT NULL,
///     subject VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (provider, subject)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported external identity providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Facebook,
}

impl Provider {
    /// Converts provider to string for database storage and route names
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
        }
    }

    /// Parses provider from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "google" => Some(Provider::Google),
            "facebook" => Some(Provider::Facebook),
            _ => None,
        }
    }
}

/// User model representing a global account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT, unique)
    pub email: String,

    /// Whether the email address has been verified
    pub email_verified: bool,

    /// Password hash; None for social-only accounts
    pub password_hash: Option<String>,

    /// First name, when known
    pub first_name: Option<String>,

    /// Last name, when known
    pub last_name: Option<String>,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name assembled from the name parts, falling back to the email
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Email address (stored case-insensitively)
    pub email: String,

    /// Whether the email arrived already verified (social providers)
    pub email_verified: bool,

    /// Password hash; None for social-only accounts
    pub password_hash: Option<String>,

    /// First name, when known
    pub first_name: Option<String>,

    /// Last name, when known
    pub last_name: Option<String>,
}

/// Link between a user and an external identity provider account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Local user the identity maps to
    pub user_id: Uuid,

    /// External provider
    pub provider: Provider,

    /// Provider-issued subject id
    pub subject: String,

    /// When the link was created
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trip() {
        assert_eq!(Provider::from_str("google"), Some(Provider::Google));
        assert_eq!(Provider::from_str("facebook"), Some(Provider::Facebook));
        assert_eq!(Provider::from_str("github"), None);
    }

    #[test]
    fn test_display_name() {
        let mut user = User {
            id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            email_verified: true,
            password_hash: None,
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(user.display_name(), "Jane Doe");

        user.last_name = None;
        assert_eq!(user.display_name(), "Jane");

        user.first_name = None;
        assert_eq!(user.display_name(), "jane@example.com");
    }
}
