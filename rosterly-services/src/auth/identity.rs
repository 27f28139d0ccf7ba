/// External identity abstraction for social sign-in
///
/// Every identity provider, whatever its wire protocol, reduces to one
/// capability: exchanging an authorization code for a verified identity.
/// Provider-specific adapters implement [`IdentityProvider`]; the rest of
/// the sign-in flow never branches on which provider produced the identity.

use async_trait::async_trait;
use serde::Deserialize;
use validator::Validate;

use rosterly_shared::auth::jwt::JwtError;
use rosterly_shared::models::user::Provider;
use rosterly_shared::store::StoreError;

/// Error type for social sign-in
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider did not supply a verified email address
    #[error("the identity provider did not supply a verified email address")]
    EmailMissing,

    /// The provider is unknown or has no configured credentials
    #[error("unknown or unconfigured identity provider: {0}")]
    InvalidProvider(String),

    /// The provider supplied a malformed email address
    #[error("the identity provider supplied a malformed email address")]
    InvalidEmail,

    /// Store failure while resolving or creating the user
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Session token could not be issued
    #[error(transparent)]
    Token(#[from] JwtError),
}

impl AuthError {
    /// Error code surfaced to the sign-in UI
    ///
    /// Only codes the UI knows how to message stay specific; everything else
    /// collapses to "generic".
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::EmailMissing => "auth-no-email",
            AuthError::InvalidProvider(_) => "auth-invalid-provider",
            _ => "generic",
        }
    }
}

/// A provider-asserted user identity
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifiedIdentity {
    /// Which provider asserted the identity
    pub provider: Provider,

    /// Provider-issued subject id
    pub subject: String,

    /// Email address, when the provider supplies one
    #[validate(email)]
    pub email: Option<String>,

    /// Whether the provider vouches for the email address
    pub email_verified: bool,

    /// Full display name, when the provider supplies one
    pub display_name: Option<String>,
}

/// Capability every identity provider adapter implements
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The provider this adapter speaks for
    fn name(&self) -> Provider;

    /// Exchanges an authorization code for a verified identity
    async fn exchange(&self, code: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Registry of configured provider adapters
///
/// Providers without configured credentials are never registered, so
/// resolving them fails the same way an unknown provider name does.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider adapter
    pub fn register(&mut self, provider: Box<dyn IdentityProvider>) {
        self.providers.push(provider);
    }

    /// Resolves a provider adapter by route name
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidProvider` for unknown names and for known
    /// providers that were never registered.
    pub fn resolve(&self, name: &str) -> Result<&dyn IdentityProvider, AuthError> {
        let provider =
            Provider::from_str(name).ok_or_else(|| AuthError::InvalidProvider(name.to_string()))?;

        self.providers
            .iter()
            .find(|p| p.name() == provider)
            .map(|p| p.as_ref())
            .ok_or_else(|| AuthError::InvalidProvider(name.to_string()))
    }
}

/// Splits a display name into first name and the remaining tokens
///
/// A single-token name yields no last name; an absent or blank display name
/// yields neither field.
pub fn split_display_name(display_name: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return (None, None);
    };

    let mut parts = name.split_whitespace();
    let first = parts.next().map(str::to_string);
    let rest: Vec<&str> = parts.collect();
    let last = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };

    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_display_name() {
        assert_eq!(
            split_display_name(Some("Jane Doe")),
            (Some("Jane".to_string()), Some("Doe".to_string()))
        );
        assert_eq!(
            split_display_name(Some("Jane van der Berg")),
            (Some("Jane".to_string()), Some("van der Berg".to_string()))
        );
        assert_eq!(
            split_display_name(Some("Prince")),
            (Some("Prince".to_string()), None)
        );
        assert_eq!(split_display_name(Some("   ")), (None, None));
        assert_eq!(split_display_name(None), (None, None));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::EmailMissing.error_code(), "auth-no-email");
        assert_eq!(
            AuthError::InvalidProvider("github".to_string()).error_code(),
            "auth-invalid-provider"
        );
        assert_eq!(
            AuthError::Store(StoreError::Unavailable("down".to_string())).error_code(),
            "generic"
        );
    }

    #[test]
    fn test_identity_email_validation() {
        let identity = VerifiedIdentity {
            provider: Provider::Google,
            subject: "sub-1".to_string(),
            email: Some("not-an-email".to_string()),
            email_verified: true,
            display_name: None,
        };
        assert!(identity.validate().is_err());

        let identity = VerifiedIdentity {
            email: Some("jane@example.com".to_string()),
            ..identity
        };
        assert!(identity.validate().is_ok());
    }

    #[test]
    fn test_registry_rejects_unknown_and_unregistered() {
        let registry = ProviderRegistry::new();

        assert!(matches!(
            registry.resolve("github"),
            Err(AuthError::InvalidProvider(_))
        ));
        assert!(matches!(
            registry.resolve("google"),
            Err(AuthError::InvalidProvider(_))
        ));
    }
}
