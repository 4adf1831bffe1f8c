use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::BytesMut;
use chrono::Utc;
use futures::stream::{self, StreamExt};

use clientele_types::MediaId;

use crate::error::{MediaError, MediaResult};
use crate::object::{Chunk, ChunkStream, MediaLimits, MediaMetadata, Upload};
use crate::traits::MediaStore;

/// A stored object: metadata record plus its ordered chunks.
#[derive(Clone, Debug)]
struct StoredMedia {
    metadata: MediaMetadata,
    chunks: Vec<Chunk>,
}

/// In-memory, HashMap-based media store.
///
/// Intended for tests and embedding. Objects live behind a `RwLock`; chunk
/// payloads are reference-counted `Bytes`, so opening a read only clones
/// handles, never the data.
pub struct InMemoryMediaStore {
    objects: RwLock<HashMap<MediaId, StoredMedia>>,
    limits: MediaLimits,
}

impl InMemoryMediaStore {
    /// Create an empty store with default chunking limits.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            limits: MediaLimits::default(),
        }
    }

    /// Create an empty store with explicit limits.
    pub fn with_limits(limits: MediaLimits) -> MediaResult<Self> {
        limits.validate()?;
        Ok(Self {
            objects: RwLock::new(HashMap::new()),
            limits,
        })
    }

    pub fn limits(&self) -> &MediaLimits {
        &self.limits
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.read_map().values().map(|obj| obj.metadata.length).sum()
    }

    /// Returns `true` if an object with this id is stored.
    pub fn contains(&self, id: &MediaId) -> bool {
        self.read_map().contains_key(id)
    }

    // A panic while holding the lock cannot leave a half-written entry:
    // every mutation is a single insert or remove.
    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<MediaId, StoredMedia>> {
        self.objects.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<MediaId, StoredMedia>> {
        self.objects.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn store(&self, upload: Upload) -> MediaResult<MediaId> {
        let Upload {
            filename,
            content_type,
            mut body,
        } = upload;
        if content_type.trim().is_empty() {
            return Err(MediaError::InvalidContentType(content_type));
        }

        let chunk_size = self.limits.chunk_size as usize;
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut pending = BytesMut::new();
        let mut length: u64 = 0;

        while let Some(piece) = body.next().await {
            let piece = piece?;
            length += piece.len() as u64;
            if length > self.limits.max_upload_bytes {
                return Err(MediaError::TooLarge {
                    limit: self.limits.max_upload_bytes,
                });
            }
            pending.extend_from_slice(&piece);
            while pending.len() >= chunk_size {
                let n = chunks.len() as u32;
                chunks.push(Chunk::new(n, pending.split_to(chunk_size).freeze()));
            }
        }
        if !pending.is_empty() {
            let n = chunks.len() as u32;
            chunks.push(Chunk::new(n, pending.freeze()));
        }

        let id = MediaId::new();
        let metadata = MediaMetadata {
            id,
            filename,
            length,
            chunk_size: self.limits.chunk_size,
            upload_date: Utc::now(),
            content_type,
        };
        let chunk_count = chunks.len();
        tracing::info!(
            media_id = %id,
            bytes = length,
            chunks = chunk_count,
            content_type = %metadata.content_type,
            "stored media object"
        );
        self.write_map().insert(id, StoredMedia { metadata, chunks });
        Ok(id)
    }

    async fn metadata(&self, id: &MediaId) -> MediaResult<MediaMetadata> {
        self.read_map()
            .get(id)
            .map(|obj| obj.metadata.clone())
            .ok_or(MediaError::NotFound(*id))
    }

    async fn open_chunks(&self, id: &MediaId) -> MediaResult<ChunkStream> {
        let chunks = self
            .read_map()
            .get(id)
            .map(|obj| obj.chunks.clone())
            .ok_or(MediaError::NotFound(*id))?;
        Ok(stream::iter(chunks.into_iter().map(Ok)).boxed())
    }

    async fn remove(&self, id: &MediaId) -> MediaResult<bool> {
        let removed = self.write_map().remove(id).is_some();
        if removed {
            tracing::info!(media_id = %id, "removed media object");
        }
        Ok(removed)
    }

    async fn list_ids(&self) -> MediaResult<Vec<MediaId>> {
        let mut ids: Vec<MediaId> = self.read_map().keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for InMemoryMediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMediaStore")
            .field("object_count", &self.len())
            .field("limits", &self.limits)
            .finish()
    }
}
