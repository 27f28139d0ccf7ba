/// Social sign-in services
///
/// - [`identity`]: the provider-agnostic identity seam and sign-in errors
/// - [`linker`]: resolution of verified identities to local users and
///   sessions

pub mod identity;
pub mod linker;

pub use identity::{AuthError, IdentityProvider, ProviderRegistry, VerifiedIdentity};
pub use linker::{IdentityLinker, SignIn};
