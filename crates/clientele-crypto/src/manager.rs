use std::sync::Arc;

use clientele_types::PasswordDigest;

use crate::error::CredentialResult;
use crate::password::{PasswordHasher, PasswordPolicy};
use crate::token::{SubjectClaims, TokenIssuer};

/// Password hashing, verification, and token issuance behind one handle.
///
/// Shared by the profile store (which hashes on create/update) and the
/// lifecycle facade (which verifies and issues tokens).
pub struct CredentialManager {
    hasher: PasswordHasher,
    issuer: Arc<dyn TokenIssuer>,
}

impl CredentialManager {
    pub fn new(policy: PasswordPolicy, issuer: Arc<dyn TokenIssuer>) -> CredentialResult<Self> {
        Ok(Self {
            hasher: PasswordHasher::new(policy)?,
            issuer,
        })
    }

    /// Hash a password under a fresh salt.
    pub fn hash(&self, password: &str) -> CredentialResult<PasswordDigest> {
        self.hasher.hash(password)
    }

    /// Check a password against a stored hash; `Ok(false)` on mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> CredentialResult<bool> {
        self.hasher.verify(password, hash)
    }

    /// Issue a bearer token for the subject.
    pub fn issue_token(&self, subject: &SubjectClaims) -> CredentialResult<String> {
        self.issuer.issue(subject)
    }

    /// The issuer tokens are minted with.
    pub fn issuer(&self) -> &Arc<dyn TokenIssuer> {
        &self.issuer
    }

    pub fn policy(&self) -> &PasswordPolicy {
        self.hasher.policy()
    }
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("policy", self.hasher.policy())
            .finish_non_exhaustive()
    }
}
