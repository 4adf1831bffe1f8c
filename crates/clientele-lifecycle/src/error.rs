use thiserror::Error;

use clientele_crypto::CredentialError;
use clientele_media::MediaError;
use clientele_profile::ProfileError;
use clientele_types::ErrorKind;

/// Caller-facing errors of the lifecycle facade.
///
/// Use [`LifecycleError::kind`] to branch on the failure class.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("email already registered: {0}")]
    EmailExists(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("authentication failed for {0}")]
    AuthenticationFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("identity verification failed: {0}")]
    IdentityRejected(String),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("profile backend error: {0}")]
    Backend(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LifecycleError {
    /// The failure class callers branch on.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmailExists(_) | Self::InvalidInput(_) | Self::Config(_) => ErrorKind::Validation,
            Self::AuthenticationFailed(_) | Self::IdentityRejected(_) => {
                ErrorKind::AuthenticationFailed
            }
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Media(e) => match e {
                MediaError::NotFound(_) => ErrorKind::NotFound,
                MediaError::InvalidContentType(_)
                | MediaError::TooLarge { .. }
                | MediaError::InvalidLimits(_) => ErrorKind::Validation,
                MediaError::Upload(_) | MediaError::Storage { .. } | MediaError::Backend(_) => {
                    ErrorKind::Storage
                }
            },
            Self::Credential(CredentialError::EmptyPassword) => ErrorKind::Validation,
            Self::Credential(_) => ErrorKind::Credential,
            Self::Backend(_) => ErrorKind::Storage,
        }
    }
}

impl From<ProfileError> for LifecycleError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(key) => Self::NotFound(format!("client record {key}")),
            ProfileError::EmailExists(email) => Self::EmailExists(email),
            ProfileError::InvalidInput(reason) => Self::InvalidInput(reason),
            ProfileError::Credential(e) => Self::Credential(e),
            ProfileError::Backend(reason) => Self::Backend(reason),
        }
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
