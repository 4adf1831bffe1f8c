//! In-memory client repository for testing and ephemeral use.
//!
//! [`InMemoryClientRepository`] keeps records and an email index in one
//! `HashMap`-backed table behind a single `RwLock`, so uniqueness checks and
//! writes happen under the same guard.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use clientele_types::{ClientId, ClientRecord};

use crate::error::{ProfileError, ProfileResult};
use crate::input::RecordPatch;
use crate::traits::ClientRepository;

#[derive(Debug, Default)]
struct Table {
    records: HashMap<ClientId, ClientRecord>,
    by_email: HashMap<String, ClientId>,
}

/// An in-memory implementation of [`ClientRepository`].
///
/// Data is lost when the repository is dropped.
#[derive(Debug, Default)]
pub struct InMemoryClientRepository {
    table: RwLock<Table>,
}

impl InMemoryClientRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.read_table().records.len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.read_table().records.is_empty()
    }

    // Each mutation finishes its checks before touching the table, so a
    // poisoned guard never exposes a half-applied write.
    fn read_table(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn insert(&self, record: ClientRecord) -> ProfileResult<ClientRecord> {
        let mut table = self.write_table();
        if table.by_email.contains_key(&record.email) {
            return Err(ProfileError::EmailExists(record.email));
        }
        if table.records.contains_key(&record.id) {
            return Err(ProfileError::Backend(format!("duplicate client id {}", record.id)));
        }
        table.by_email.insert(record.email.clone(), record.id);
        table.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: &ClientId) -> ProfileResult<Option<ClientRecord>> {
        Ok(self.read_table().records.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> ProfileResult<Option<ClientRecord>> {
        let table = self.read_table();
        Ok(table
            .by_email
            .get(email)
            .and_then(|id| table.records.get(id))
            .cloned())
    }

    async fn find_by_social_id(&self, social_id: &str) -> ProfileResult<Option<ClientRecord>> {
        let table = self.read_table();
        Ok(table
            .records
            .values()
            .find(|r| r.social_id.as_deref() == Some(social_id))
            .cloned())
    }

    async fn update(
        &self,
        id: &ClientId,
        patch: &RecordPatch,
    ) -> ProfileResult<Option<ClientRecord>> {
        let mut table = self.write_table();
        let Some(current) = table.records.get(id) else {
            return Ok(None);
        };
        let old_email = current.email.clone();

        if let Some(email) = &patch.email {
            if *email != old_email {
                if let Some(owner) = table.by_email.get(email) {
                    if owner != id {
                        return Err(ProfileError::EmailExists(email.clone()));
                    }
                }
            }
        }

        let mut updated = current.clone();
        patch.apply(&mut updated);
        if updated.email != old_email {
            table.by_email.remove(&old_email);
            table.by_email.insert(updated.email.clone(), *id);
        }
        table.records.insert(*id, updated.clone());
        Ok(Some(updated))
    }

    async fn remove(&self, id: &ClientId) -> ProfileResult<Option<ClientRecord>> {
        let mut table = self.write_table();
        let removed = table.records.remove(id);
        if let Some(record) = &removed {
            table.by_email.remove(&record.email);
        }
        Ok(removed)
    }

    async fn list(&self) -> ProfileResult<Vec<ClientRecord>> {
        let mut records: Vec<ClientRecord> = self.read_table().records.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientele_types::{ImageRef, MediaId};
    use std::sync::Arc;

    fn record(email: &str) -> ClientRecord {
        ClientRecord::new(email, "A X", "A", "X")
    }

    // -----------------------------------------------------------------------
    // Insert / read
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryClientRepository::new();
        let rec = repo.insert(record("a@x.com")).await.unwrap();
        let got = repo.get(&rec.id).await.unwrap().expect("should exist");
        assert_eq!(got, rec);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let repo = InMemoryClientRepository::new();
        repo.insert(record("a@x.com")).await.unwrap();
        let err = repo.insert(record("a@x.com")).await.unwrap_err();
        assert!(matches!(err, ProfileError::EmailExists(ref e) if e == "a@x.com"));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_keep_one_record() {
        let repo = Arc::new(InMemoryClientRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.insert(record("race@x.com")).await.is_ok() })
            })
            .collect();
        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn find_by_email_and_social_id() {
        let repo = InMemoryClientRepository::new();
        let rec = repo
            .insert(record("a@x.com").with_social_id("g-1"))
            .await
            .unwrap();
        assert_eq!(repo.find_by_email("a@x.com").await.unwrap().unwrap().id, rec.id);
        assert_eq!(repo.find_by_social_id("g-1").await.unwrap().unwrap().id, rec.id);
        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
        assert!(repo.find_by_social_id("g-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let repo = InMemoryClientRepository::new();
        assert!(repo.get(&ClientId::new()).await.unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn update_returns_post_update_record() {
        let repo = InMemoryClientRepository::new();
        let rec = repo.insert(record("a@x.com")).await.unwrap();
        let media = MediaId::new();
        let updated = repo
            .update(&rec.id, &RecordPatch::image(ImageRef::Media(media)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.image.media_id(), Some(media));
        assert_eq!(repo.get(&rec.id).await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn update_missing_is_none() {
        let repo = InMemoryClientRepository::new();
        let out = repo
            .update(&ClientId::new(), &RecordPatch::social_id("g"))
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn update_email_moves_index() {
        let repo = InMemoryClientRepository::new();
        let rec = repo.insert(record("a@x.com")).await.unwrap();
        let patch = RecordPatch {
            email: Some("b@x.com".into()),
            ..Default::default()
        };
        repo.update(&rec.id, &patch).await.unwrap().unwrap();
        assert!(repo.find_by_email("a@x.com").await.unwrap().is_none());
        assert_eq!(repo.find_by_email("b@x.com").await.unwrap().unwrap().id, rec.id);
        // The old email is free again.
        repo.insert(record("a@x.com")).await.unwrap();
    }

    #[tokio::test]
    async fn update_to_taken_email_rejected() {
        let repo = InMemoryClientRepository::new();
        let a = repo.insert(record("a@x.com")).await.unwrap();
        repo.insert(record("b@x.com")).await.unwrap();
        let patch = RecordPatch {
            email: Some("b@x.com".into()),
            ..Default::default()
        };
        let err = repo.update(&a.id, &patch).await.unwrap_err();
        assert!(matches!(err, ProfileError::EmailExists(_)));
        assert_eq!(repo.get(&a.id).await.unwrap().unwrap().email, "a@x.com");
    }

    #[tokio::test]
    async fn update_to_own_email_is_allowed() {
        let repo = InMemoryClientRepository::new();
        let a = repo.insert(record("a@x.com")).await.unwrap();
        let patch = RecordPatch {
            email: Some("a@x.com".into()),
            ..Default::default()
        };
        assert!(repo.update(&a.id, &patch).await.unwrap().is_some());
    }

    // -----------------------------------------------------------------------
    // Remove / list
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn remove_returns_record_once() {
        let repo = InMemoryClientRepository::new();
        let rec = repo.insert(record("a@x.com")).await.unwrap();
        assert_eq!(repo.remove(&rec.id).await.unwrap().unwrap().id, rec.id);
        assert!(repo.remove(&rec.id).await.unwrap().is_none());
        assert!(repo.find_by_email("a@x.com").await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let repo = InMemoryClientRepository::new();
        repo.insert(record("a@x.com")).await.unwrap();
        repo.insert(record("b@x.com")).await.unwrap();
        repo.insert(record("c@x.com")).await.unwrap();
        let records = repo.list().await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].id <= w[1].id));
    }
}
