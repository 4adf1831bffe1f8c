use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier {value:?}: {reason}")]
    InvalidId { value: String, reason: String },
}

/// Caller-facing failure classification.
///
/// Every error surfaced by the lifecycle facade maps onto exactly one kind,
/// so callers branch on the kind instead of on falsy return values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Rejected input, including a duplicate email.
    Validation,
    /// The record exists but the supplied password does not match.
    AuthenticationFailed,
    /// The client record or media object does not exist.
    NotFound,
    /// Chunk I/O failure or an incomplete chunk stream.
    Storage,
    /// Hashing, verification, or token signing failure.
    Credential,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::AuthenticationFailed => write!(f, "authentication-failed"),
            Self::NotFound => write!(f, "not-found"),
            Self::Storage => write!(f, "storage"),
            Self::Credential => write!(f, "credential"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display() {
        assert_eq!(ErrorKind::Validation.to_string(), "validation");
        assert_eq!(ErrorKind::AuthenticationFailed.to_string(), "authentication-failed");
        assert_eq!(ErrorKind::NotFound.to_string(), "not-found");
        assert_eq!(ErrorKind::Storage.to_string(), "storage");
        assert_eq!(ErrorKind::Credential.to_string(), "credential");
    }

    #[test]
    fn invalid_id_message() {
        let err = TypeError::InvalidId {
            value: "zzz".into(),
            reason: "bad".into(),
        };
        assert!(err.to_string().contains("zzz"));
    }
}
