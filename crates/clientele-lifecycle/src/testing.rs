//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use clientele_crypto::{CredentialManager, Ed25519TokenIssuer, PasswordPolicy, SigningKey};
use clientele_media::{
    ChunkStream, InMemoryMediaStore, MediaError, MediaMetadata, MediaResult, MediaStore, Upload,
};
use clientele_profile::{InMemoryClientRepository, ProfileStore};
use clientele_types::MediaId;

use crate::lifecycle::ClientLifecycle;

/// In-memory media store that records removals and can inject failures.
#[derive(Default)]
pub(crate) struct RecordingMediaStore {
    inner: InMemoryMediaStore,
    removed: Mutex<Vec<MediaId>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    fail_removes: AtomicBool,
}

impl RecordingMediaStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every id passed to `remove`, including failed attempts.
    pub(crate) fn removed(&self) -> Vec<MediaId> {
        self.removed.lock().unwrap().clone()
    }

    pub(crate) fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn contains(&self, id: &MediaId) -> bool {
        self.inner.contains(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn store(&self, upload: Upload) -> MediaResult<MediaId> {
        self.inner.store(upload).await
    }

    async fn metadata(&self, id: &MediaId) -> MediaResult<MediaMetadata> {
        self.inner.metadata(id).await
    }

    async fn open_chunks(&self, id: &MediaId) -> MediaResult<ChunkStream> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let chunks = self.inner.open_chunks(id).await?;
        if self.fail_reads.load(Ordering::SeqCst) {
            let id = *id;
            return Ok(stream::once(async move { Err(MediaError::storage(id, "chunk read failed")) })
                .boxed());
        }
        Ok(chunks)
    }

    async fn remove(&self, id: &MediaId) -> MediaResult<bool> {
        self.removed.lock().unwrap().push(*id);
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(MediaError::Backend("connection reset".into()));
        }
        self.inner.remove(id).await
    }

    async fn list_ids(&self) -> MediaResult<Vec<MediaId>> {
        self.inner.list_ids().await
    }
}

/// A facade over fresh in-memory stores with cheap password hashing.
pub(crate) struct Harness {
    pub(crate) lifecycle: ClientLifecycle,
    pub(crate) media: Arc<RecordingMediaStore>,
    pub(crate) credentials: Arc<CredentialManager>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let issuer = Arc::new(Ed25519TokenIssuer::new(
            SigningKey::generate(),
            chrono::Duration::minutes(5),
        ));
        let credentials =
            Arc::new(CredentialManager::new(PasswordPolicy::minimal(), issuer).unwrap());
        let profiles = ProfileStore::new(Arc::new(InMemoryClientRepository::new()), credentials.clone());
        let media = Arc::new(RecordingMediaStore::new());
        let lifecycle = ClientLifecycle::new(profiles, media.clone(), credentials.clone());
        Self {
            lifecycle,
            media,
            credentials,
        }
    }
}

pub(crate) fn png(bytes: &'static [u8]) -> Upload {
    Upload::from_bytes("avatar.png", "image/png", bytes)
}

pub(crate) fn jpeg(bytes: &'static [u8]) -> Upload {
    Upload::from_bytes("avatar.jpg", "image/jpeg", bytes)
}
