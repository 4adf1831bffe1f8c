//! Error types for profile operations.

use std::fmt;

use thiserror::Error;

use clientele_crypto::CredentialError;
use clientele_types::ClientId;

/// The key a failed lookup was made with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupKey {
    Id(ClientId),
    Email(String),
    SocialId(String),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Email(email) => write!(f, "email {email}"),
            Self::SocialId(social_id) => write!(f, "social id {social_id}"),
        }
    }
}

/// Errors that can occur during profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No record matches the lookup.
    #[error("client not found by {0}")]
    NotFound(LookupKey),

    /// Another record already uses this email.
    #[error("email already exists: {0}")]
    EmailExists(String),

    /// A required field is missing or malformed.
    #[error("invalid profile input: {0}")]
    InvalidInput(String),

    /// Password hashing failed.
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    /// The document store is unavailable.
    #[error("profile backend error: {0}")]
    Backend(String),
}

/// Convenience type alias for profile operations.
pub type ProfileResult<T> = std::result::Result<T, ProfileError>;
