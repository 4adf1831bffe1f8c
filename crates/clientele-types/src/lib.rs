//! Foundation types for Clientele.
//!
//! This crate provides the identifiers, persisted records, and read-only
//! projections shared by every other Clientele crate.
//!
//! # Key Types
//!
//! - [`ClientId`]: UUID v7 identifier of a client record
//! - [`MediaId`]: UUID v7 identifier of a media object in the chunked store
//! - [`ImageRef`]: A record's picture slot: the sentinel placeholder or a media id
//! - [`ClientRecord`]: Persisted identity/profile document
//! - [`ProfileView`]: Externally visible projection of a record
//! - [`ResolvedImage`]: The picture slot after media resolution
//! - [`VerifiedIdentity`]: Normalized output of a third-party identity check
//! - [`ErrorKind`]: Caller-facing failure classification

pub mod client;
pub mod error;
pub mod id;
pub mod image;
pub mod profile;

pub use client::{ClientRecord, PasswordDigest};
pub use error::{ErrorKind, TypeError};
pub use id::{ClientId, MediaId};
pub use image::{ImageRef, ResolvedImage, DEFAULT_AVATAR_URL};
pub use profile::{ProfileView, VerifiedIdentity};
