//! Client record storage for Clientele.
//!
//! This crate owns the persisted [`ClientRecord`] documents: creation with
//! freshly hashed passwords, lookups by id, email, and social id, partial
//! updates, and deletion.
//!
//! # Architecture
//!
//! - [`ClientRepository`] is the document-store boundary. Implementations
//!   enforce email uniqueness and apply each update atomically to a single
//!   record; nothing above them takes locks.
//! - [`ProfileStore`] sits on top of a repository and a
//!   [`CredentialManager`](clientele_crypto::CredentialManager), turning raw
//!   inputs into records and repository misses into typed errors.
//!
//! # Modules
//!
//! - [`error`]: Error types for profile operations
//! - [`input`]: Creation and patch inputs
//! - [`traits`]: The [`ClientRepository`] trait
//! - [`memory`]: In-memory [`InMemoryClientRepository`]
//! - [`store`]: [`ProfileStore`]
//!
//! [`ClientRecord`]: clientele_types::ClientRecord

pub mod error;
pub mod input;
pub mod memory;
pub mod store;
pub mod traits;

pub use error::{LookupKey, ProfileError, ProfileResult};
pub use input::{normalize_email, NewClient, ProfilePatch, RecordPatch};
pub use memory::InMemoryClientRepository;
pub use store::ProfileStore;
pub use traits::ClientRepository;
