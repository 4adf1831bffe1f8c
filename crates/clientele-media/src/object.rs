use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};

use clientele_types::MediaId;

use crate::error::{MediaError, MediaResult};

/// Default chunk size: 255 KiB, the customary size for chunked blob stores.
pub const DEFAULT_CHUNK_SIZE: u32 = 255 * 1024;

/// Default upload ceiling: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Incoming bytes of an upload.
pub type ByteStream = BoxStream<'static, MediaResult<Bytes>>;

/// Stored chunks of one object, in stored order.
pub type ChunkStream = BoxStream<'static, MediaResult<Chunk>>;

/// Metadata record of a stored media object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    pub id: MediaId,
    pub filename: String,
    /// Total size in bytes.
    pub length: u64,
    pub chunk_size: u32,
    pub upload_date: DateTime<Utc>,
    pub content_type: String,
}

impl MediaMetadata {
    /// Number of chunks an object of this length occupies.
    pub fn chunk_count(&self) -> u64 {
        if self.chunk_size == 0 {
            return 0;
        }
        self.length.div_ceil(u64::from(self.chunk_size))
    }
}

/// One numbered chunk of a media object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the object, starting at zero.
    pub n: u32,
    pub data: Bytes,
}

impl Chunk {
    pub fn new(n: u32, data: impl Into<Bytes>) -> Self {
        Self {
            n,
            data: data.into(),
        }
    }
}

/// A picture upload: descriptive fields plus the byte stream to store.
pub struct Upload {
    pub filename: String,
    pub content_type: String,
    pub body: ByteStream,
}

impl Upload {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, body: ByteStream) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            body,
        }
    }

    /// An upload whose whole body is already in memory.
    pub fn from_bytes(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self::new(filename, content_type, stream::iter([Ok(data)]).boxed())
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Chunking and size limits applied on upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaLimits {
    pub chunk_size: u32,
    pub max_upload_bytes: u64,
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl MediaLimits {
    pub fn validate(&self) -> MediaResult<()> {
        if self.chunk_size == 0 {
            return Err(MediaError::InvalidLimits("chunk_size must be positive".into()));
        }
        Ok(())
    }
}
