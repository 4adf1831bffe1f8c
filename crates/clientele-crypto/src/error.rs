/// Errors from credential operations.
///
/// A failure to hash or verify is never reported as "wrong password";
/// verification mismatches are an `Ok(false)`, not an error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("password must not be empty")]
    EmptyPassword,

    #[error("invalid password policy: {0}")]
    InvalidPolicy(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("token encoding failed: {0}")]
    TokenEncoding(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("invalid key")]
    InvalidKey,

    #[error("invalid signature")]
    InvalidSignature,
}

/// Result alias for credential operations.
pub type CredentialResult<T> = Result<T, CredentialError>;
