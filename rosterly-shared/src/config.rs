/// Configuration management
///
/// Loads configuration from environment variables into a type-safe struct.
/// The struct is handed to components explicitly at construction; nothing in
/// the codebase reads the environment after startup.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `JWT_SECRET`: secret key for session token signing (required, >= 32 chars)
/// - `AUTH_SOCIAL_GOOGLE_CLIENT_ID` / `_CLIENT_SECRET` / `_CALLBACK_URL`:
///   Google sign-in credentials; the provider is disabled when unset
/// - `AUTH_SOCIAL_FACEBOOK_CLIENT_ID` / `_CLIENT_SECRET` / `_CALLBACK_URL`:
///   Facebook sign-in credentials; the provider is disabled when unset

use std::env;

use crate::db::pool::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Session token configuration
    pub jwt: JwtConfig,

    /// Social sign-in provider credentials
    pub social: SocialConfig,
}

/// Session token configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HS256 signing; at least 32 bytes
    pub secret: String,
}

/// Credentials for one external identity provider
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Redirect URL registered with the provider
    pub callback_url: String,
}

/// Social sign-in configuration; a provider with no credentials is disabled
#[derive(Debug, Clone, Default)]
pub struct SocialConfig {
    pub google: Option<ProviderCredentials>,
    pub facebook: Option<ProviderCredentials>,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing, values fail to
    /// parse, or provider credentials are only partially supplied.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        Ok(Self {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                ..Default::default()
            },
            jwt: JwtConfig { secret: jwt_secret },
            social: SocialConfig {
                google: provider_from_env("AUTH_SOCIAL_GOOGLE")?,
                facebook: provider_from_env("AUTH_SOCIAL_FACEBOOK")?,
            },
        })
    }
}

/// Reads one provider's credential triple; absent client id disables the
/// provider, a partial triple is a configuration error
fn provider_from_env(prefix: &str) -> anyhow::Result<Option<ProviderCredentials>> {
    let client_id = match env::var(format!("{}_CLIENT_ID", prefix)) {
        Ok(id) => id,
        Err(_) => return Ok(None),
    };

    let client_secret = env::var(format!("{}_CLIENT_SECRET", prefix))
        .map_err(|_| anyhow::anyhow!("{}_CLIENT_SECRET is required when {}_CLIENT_ID is set", prefix, prefix))?;
    let callback_url = env::var(format!("{}_CALLBACK_URL", prefix))
        .map_err(|_| anyhow::anyhow!("{}_CALLBACK_URL is required when {}_CLIENT_ID is set", prefix, prefix))?;

    Ok(Some(ProviderCredentials {
        client_id,
        client_secret,
        callback_url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_config_default_disables_providers() {
        let social = SocialConfig::default();
        assert!(social.google.is_none());
        assert!(social.facebook.is_none());
    }
}
