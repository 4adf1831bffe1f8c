//! The [`ClientRepository`] trait defining the record storage interface.
//!
//! Any backend (in-memory, document database) implements this trait to
//! persist client records.

use async_trait::async_trait;

use clientele_types::{ClientId, ClientRecord};

use crate::error::ProfileResult;
use crate::input::RecordPatch;

/// Storage backend for client records.
///
/// Implementations must be thread-safe (`Send + Sync`) and provide:
///
/// - atomic unique-email enforcement on `insert` and on email-changing
///   `update`s, reported as `ProfileError::EmailExists`;
/// - atomic single-record find-and-update semantics for `update`.
///
/// Emails are compared exactly; callers normalize them first.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, record: ClientRecord) -> ProfileResult<ClientRecord>;

    /// Read a record by id. Returns `Ok(None)` if it does not exist.
    async fn get(&self, id: &ClientId) -> ProfileResult<Option<ClientRecord>>;

    /// Read a record by its (normalized) email.
    async fn find_by_email(&self, email: &str) -> ProfileResult<Option<ClientRecord>>;

    /// Read a record by its linked social id.
    async fn find_by_social_id(&self, social_id: &str) -> ProfileResult<Option<ClientRecord>>;

    /// Apply a patch and return the post-update record, or `Ok(None)` if no
    /// record has this id.
    async fn update(&self, id: &ClientId, patch: &RecordPatch)
        -> ProfileResult<Option<ClientRecord>>;

    /// Delete a record, returning it if it existed.
    async fn remove(&self, id: &ClientId) -> ProfileResult<Option<ClientRecord>>;

    /// Every stored record, ordered by id.
    async fn list(&self) -> ProfileResult<Vec<ClientRecord>>;
}
