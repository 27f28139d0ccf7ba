/// Social sign-in: mapping verified identities to local users
///
/// A verified identity resolves to a local user in three steps: by the
/// provider-issued subject, then by email (linking the identity for next
/// time), and finally by creating a fresh account. Brand-new users get a
/// personal tenant on the free plan with themselves as admin, so every
/// sign-in lands somewhere usable.

use rosterly_shared::auth::jwt::{create_token, Claims};
use rosterly_shared::config::JwtConfig;
use rosterly_shared::models::user::{NewUser, User};
use rosterly_shared::store::IdentityStore;
use validator::Validate;

use crate::auth::identity::{split_display_name, AuthError, VerifiedIdentity};

/// Outcome of a successful social sign-in
#[derive(Debug, Clone)]
pub struct SignIn {
    /// Session token for the signed-in user
    pub token: String,

    /// The resolved local user id
    pub user_id: uuid::Uuid,

    /// Whether a new account was created for this sign-in
    pub created: bool,
}

/// Maps verified external identities to local users and sessions
pub struct IdentityLinker<'a, S: IdentityStore> {
    store: &'a S,
    jwt: &'a JwtConfig,
}

impl<'a, S: IdentityStore> IdentityLinker<'a, S> {
    /// Creates a linker bound to a store and token configuration
    pub fn new(store: &'a S, jwt: &'a JwtConfig) -> Self {
        IdentityLinker { store, jwt }
    }

    /// Signs a verified identity in, creating and onboarding the user if
    /// needed
    ///
    /// # Errors
    ///
    /// - `EmailMissing` when the provider supplied no email or an unverified
    ///   one; the UI receives the `auth-no-email` code
    /// - `InvalidEmail` when the supplied email is malformed
    /// - `Store` / `Token` for infrastructure failures
    pub async fn sign_in(&self, identity: VerifiedIdentity) -> Result<SignIn, AuthError> {
        identity.validate().map_err(|_| AuthError::InvalidEmail)?;

        let email = identity
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::EmailMissing)?;

        if !identity.email_verified {
            return Err(AuthError::EmailMissing);
        }

        // Already linked
        if let Some(user) = self
            .store
            .find_user_by_identity(identity.provider, &identity.subject)
            .await?
        {
            return self.establish_session(&user, false);
        }

        // Same email, first sign-in through this provider: link and proceed
        if let Some(user) = self.store.find_user_by_email(email).await? {
            self.store
                .link_identity(user.id, identity.provider, &identity.subject)
                .await?;
            tracing::info!(
                user_id = %user.id,
                provider = identity.provider.as_str(),
                "linked external identity to existing user"
            );
            return self.establish_session(&user, false);
        }

        // Brand-new account
        let (first_name, last_name) = split_display_name(identity.display_name.as_deref());
        let user = self
            .store
            .create_user(NewUser {
                email: email.to_string(),
                email_verified: true,
                password_hash: None,
                first_name,
                last_name,
            })
            .await?;
        self.store
            .link_identity(user.id, identity.provider, &identity.subject)
            .await?;

        let tenant = self
            .store
            .create_tenant_with_admin(&personal_tenant_name(&user), user.id)
            .await?;
        tracing::info!(
            user_id = %user.id,
            tenant_id = %tenant.id,
            provider = identity.provider.as_str(),
            "onboarded new user from social sign-in"
        );

        self.establish_session(&user, true)
    }

    fn establish_session(&self, user: &User, created: bool) -> Result<SignIn, AuthError> {
        let claims = Claims::new(user.id);
        let token = create_token(&claims, &self.jwt.secret)?;
        Ok(SignIn {
            token,
            user_id: user.id,
            created,
        })
    }
}

fn personal_tenant_name(user: &User) -> String {
    match &user.first_name {
        Some(first) => format!("{}'s Workspace", first),
        None => "My Workspace".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_personal_tenant_name() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            email_verified: true,
            password_hash: None,
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(personal_tenant_name(&user), "Jane's Workspace");

        let anonymous = User {
            first_name: None,
            ..user
        };
        assert_eq!(personal_tenant_name(&anonymous), "My Workspace");
    }
}
