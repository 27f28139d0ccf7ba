//! Integration tests for social sign-in, run against the in-memory store.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use rosterly_services::auth::{
    AuthError, IdentityLinker, IdentityProvider, ProviderRegistry, VerifiedIdentity,
};
use rosterly_shared::auth::jwt::validate_token;
use rosterly_shared::config::JwtConfig;
use rosterly_shared::models::membership::Role;
use rosterly_shared::models::user::{Provider, User};
use rosterly_shared::store::memory::MemoryStore;
use rosterly_shared::store::{IdentityStore, MembershipStore};

const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SECRET.to_string(),
    }
}

fn identity(provider: Provider, subject: &str, email: Option<&str>) -> VerifiedIdentity {
    VerifiedIdentity {
        provider,
        subject: subject.to_string(),
        email: email.map(str::to_string),
        email_verified: true,
        display_name: Some("Jane van der Berg".to_string()),
    }
}

#[tokio::test]
async fn sign_in_creates_user_and_personal_tenant() {
    let store = MemoryStore::new();
    let jwt = jwt_config();
    let linker = IdentityLinker::new(&store, &jwt);

    let result = linker
        .sign_in(identity(Provider::Google, "sub-1", Some("jane@example.com")))
        .await
        .unwrap();

    assert!(result.created);

    let user = store.find_user(result.user_id).await.unwrap().unwrap();
    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.first_name.as_deref(), Some("Jane"));
    assert_eq!(user.last_name.as_deref(), Some("van der Berg"));
    assert!(user.password_hash.is_none());

    // Onboarded into a fresh tenant as admin
    let memberships = store.memberships_of(result.user_id);
    assert_eq!(memberships.len(), 1);
    assert!(memberships[0].roles.contains(&Role::Admin));

    // The session token names the new user
    let claims = validate_token(&result.token, SECRET).unwrap();
    assert_eq!(claims.sub, result.user_id);
}

#[tokio::test]
async fn sign_in_finds_user_by_linked_identity() {
    let store = MemoryStore::new();
    let jwt = jwt_config();
    let linker = IdentityLinker::new(&store, &jwt);

    let first = linker
        .sign_in(identity(Provider::Google, "sub-1", Some("jane@example.com")))
        .await
        .unwrap();
    let second = linker
        .sign_in(identity(Provider::Google, "sub-1", Some("jane@example.com")))
        .await
        .unwrap();

    assert!(!second.created);
    assert_eq!(first.user_id, second.user_id);
    assert_eq!(store.memberships_of(first.user_id).len(), 1);
}

#[tokio::test]
async fn sign_in_links_identity_to_existing_email() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let existing = User {
        id: Uuid::new_v4(),
        email: "jane@example.com".to_string(),
        email_verified: true,
        password_hash: Some("$argon2id$placeholder".to_string()),
        first_name: Some("Jane".to_string()),
        last_name: None,
        created_at: now,
        updated_at: now,
    };
    store.insert_user(existing.clone());

    let jwt = jwt_config();
    let linker = IdentityLinker::new(&store, &jwt);
    let result = linker
        .sign_in(identity(Provider::Facebook, "fb-9", Some("JANE@example.com")))
        .await
        .unwrap();

    assert!(!result.created);
    assert_eq!(result.user_id, existing.id);

    // The identity is now linked for subsequent sign-ins
    let linked = store
        .find_user_by_identity(Provider::Facebook, "fb-9")
        .await
        .unwrap();
    assert_eq!(linked.map(|u| u.id), Some(existing.id));
}

#[tokio::test]
async fn sign_in_requires_an_email() {
    let store = MemoryStore::new();
    let jwt = jwt_config();
    let linker = IdentityLinker::new(&store, &jwt);

    let error = linker
        .sign_in(identity(Provider::Google, "sub-1", None))
        .await
        .unwrap_err();

    assert!(matches!(error, AuthError::EmailMissing));
    assert_eq!(error.error_code(), "auth-no-email");
}

#[tokio::test]
async fn sign_in_requires_a_verified_email() {
    let store = MemoryStore::new();
    let jwt = jwt_config();
    let linker = IdentityLinker::new(&store, &jwt);

    let mut unverified = identity(Provider::Google, "sub-1", Some("jane@example.com"));
    unverified.email_verified = false;

    let error = linker.sign_in(unverified).await.unwrap_err();
    assert_eq!(error.error_code(), "auth-no-email");
}

#[tokio::test]
async fn sign_in_rejects_malformed_email() {
    let store = MemoryStore::new();
    let jwt = jwt_config();
    let linker = IdentityLinker::new(&store, &jwt);

    let error = linker
        .sign_in(identity(Provider::Google, "sub-1", Some("not-an-email")))
        .await
        .unwrap_err();

    assert!(matches!(error, AuthError::InvalidEmail));
    assert_eq!(error.error_code(), "generic");
}

struct FakeGoogle;

#[async_trait]
impl IdentityProvider for FakeGoogle {
    fn name(&self) -> Provider {
        Provider::Google
    }

    async fn exchange(&self, code: &str) -> Result<VerifiedIdentity, AuthError> {
        Ok(identity(
            Provider::Google,
            &format!("sub-{}", code),
            Some("jane@example.com"),
        ))
    }
}

#[tokio::test]
async fn registry_exchange_feeds_sign_in() {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(FakeGoogle));

    let provider = registry.resolve("google").unwrap();
    let verified = provider.exchange("abc").await.unwrap();
    assert_eq!(verified.subject, "sub-abc");

    let store = MemoryStore::new();
    let jwt = jwt_config();
    let linker = IdentityLinker::new(&store, &jwt);
    let result = linker.sign_in(verified).await.unwrap();
    assert!(result.created);

    // Facebook was never registered, so it resolves the same as an unknown
    // provider name
    assert!(matches!(
        registry.resolve("facebook"),
        Err(AuthError::InvalidProvider(_))
    ));
    assert!(matches!(
        registry.resolve("github"),
        Err(AuthError::InvalidProvider(_))
    ));
}
