//! Chunked binary media store for Clientele.
//!
//! Media objects (profile pictures) are held as a metadata record plus an
//! ordered sequence of fixed-size chunks, following the generic chunked
//! blob store layout: `{filename, length, chunkSize, uploadDate,
//! contentType}` and chunks numbered from zero.
//!
//! # Storage Backends
//!
//! All backends implement the [`MediaStore`] trait:
//!
//! - [`InMemoryMediaStore`]: `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. An upload is persisted only after its byte stream completes; a failed
//!    upload leaves nothing behind.
//! 2. Reads consume chunks strictly in stored order and return nothing
//!    until the whole object has been read and checked.
//! 3. Every read opens its own chunk stream, so concurrent reads of one
//!    object are independent.
//! 4. Dropping a read future drops its chunk stream; no partial result
//!    escapes.
//! 5. `delete` is best-effort and reports `false` instead of failing;
//!    `remove` keeps the typed error for callers that need it.

pub mod data_url;
pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{MediaError, MediaResult};
pub use memory::InMemoryMediaStore;
pub use object::{ByteStream, Chunk, ChunkStream, MediaLimits, MediaMetadata, Upload};
pub use traits::MediaStore;
