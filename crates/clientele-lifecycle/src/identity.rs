//! Third-party identity verification.
//!
//! The OAuth handshake itself lives outside this crate. A provider
//! integration implements [`IdentityVerifier`] and hands back a normalized
//! [`VerifiedIdentity`]; the facade only consumes that shape.

use async_trait::async_trait;

use clientele_types::VerifiedIdentity;

use crate::error::LifecycleResult;

/// Tokens obtained from a provider's authorization flow.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl ProviderCredentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A provider capable of turning credentials into a verified identity.
///
/// Implementations reject unusable credentials with
/// [`LifecycleError::IdentityRejected`](crate::LifecycleError::IdentityRejected).
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Provider name, used in logs.
    fn provider(&self) -> &str;

    async fn verify(&self, credentials: &ProviderCredentials) -> LifecycleResult<VerifiedIdentity>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_tokens() {
        let creds = ProviderCredentials::new("access-123").with_refresh_token("refresh-456");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("access-123"));
        assert!(!debug.contains("refresh-456"));
    }
}
