//! Credential primitives for Clientele.
//!
//! Provides argon2id password hashing and verification, Ed25519 signing
//! keys, and the [`TokenIssuer`] seam through which bearer tokens are minted.
//! [`CredentialManager`] bundles these for the profile and lifecycle layers.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod error;
pub mod manager;
pub mod password;
pub mod signer;
pub mod token;

pub use error::{CredentialError, CredentialResult};
pub use manager::CredentialManager;
pub use password::{PasswordHasher, PasswordPolicy};
pub use signer::{Signature, SigningKey, VerifyingKey};
pub use token::{Ed25519TokenIssuer, SubjectClaims, TokenClaims, TokenIssuer};
