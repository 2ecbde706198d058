//! Bearer-credential identity verification.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// A verified user identity returned by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable user id.
    pub id: String,
    /// Email address, if the provider exposes one.
    pub email: Option<String>,
}

/// Verifies a bearer credential against the identity provider.
///
/// `Ok(None)` means the credential is absent, malformed, or rejected; the
/// caller treats that as unauthorized. `Err` is reserved for transport
/// failures talking to the provider.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve a bearer token to a user identity.
    async fn verify(&self, token: &str) -> Result<Option<AuthUser>, GatewayError>;
}
