use async_trait::async_trait;

use clientele_types::MediaId;

use crate::data_url;
use crate::error::MediaResult;
use crate::object::{ChunkStream, MediaMetadata, Upload};

/// Chunked binary object store.
///
/// All implementations must satisfy these invariants:
/// - An object becomes visible only once its upload stream has completed.
/// - `open_chunks` yields chunks in stored order, numbered from zero, and
///   each call opens an independent stream.
/// - Backend failures are reported as typed errors; only [`delete`]
///   flattens them into a boolean.
///
/// [`delete`]: MediaStore::delete
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Consume an upload and persist it, returning the new object's id.
    async fn store(&self, upload: Upload) -> MediaResult<MediaId>;

    /// Look up an object's metadata record.
    async fn metadata(&self, id: &MediaId) -> MediaResult<MediaMetadata>;

    /// Open a fresh stream over an object's chunks.
    async fn open_chunks(&self, id: &MediaId) -> MediaResult<ChunkStream>;

    /// Remove an object and its chunks. Returns `true` if the object existed.
    async fn remove(&self, id: &MediaId) -> MediaResult<bool>;

    /// Ids of every stored object.
    async fn list_ids(&self) -> MediaResult<Vec<MediaId>>;

    /// Read a whole object as `data:<contentType>;base64,<payload>`.
    ///
    /// Fails with `NotFound` if the object is absent and `Storage` if the
    /// chunk stream errors or does not match the metadata.
    async fn read_data_url(&self, id: &MediaId) -> MediaResult<String> {
        let metadata = self.metadata(id).await?;
        let chunks = self.open_chunks(id).await?;
        let url = data_url::assemble(&metadata, chunks).await?;
        tracing::debug!(media_id = %id, bytes = metadata.length, "assembled data url");
        Ok(url)
    }

    /// Best-effort removal for cleanup paths.
    ///
    /// Returns `false` when the object does not exist or the backend fails;
    /// failures are logged rather than returned.
    async fn delete(&self, id: &MediaId) -> bool {
        match self.remove(id).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::debug!(media_id = %id, "delete skipped: media object absent");
                false
            }
            Err(e) => {
                tracing::warn!(media_id = %id, error = %e, "media delete failed");
                false
            }
        }
    }
}
