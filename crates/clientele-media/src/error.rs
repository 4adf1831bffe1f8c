use clientele_types::MediaId;

/// Errors from media store operations.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The requested media object was not found.
    #[error("media object not found: {0}")]
    NotFound(MediaId),

    /// The upload carried no usable content type.
    #[error("invalid content type: {0:?}")]
    InvalidContentType(String),

    /// The upload exceeded the configured size limit.
    #[error("upload exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    /// The upload's byte stream failed before completing.
    #[error("upload stream failed: {0}")]
    Upload(String),

    /// Chunk I/O failure or an incomplete/out-of-order chunk stream.
    #[error("storage error for {id}: {reason}")]
    Storage { id: MediaId, reason: String },

    /// The storage backend itself is unavailable.
    #[error("media backend error: {0}")]
    Backend(String),

    /// Chunking parameters are unusable.
    #[error("invalid media limits: {0}")]
    InvalidLimits(String),
}

impl MediaError {
    pub fn storage(id: MediaId, reason: impl Into<String>) -> Self {
        Self::Storage {
            id,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for media store operations.
pub type MediaResult<T> = Result<T, MediaError>;
