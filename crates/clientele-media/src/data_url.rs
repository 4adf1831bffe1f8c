//! Reassembly of stored chunks into `data:` URLs.

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use futures::StreamExt;

use crate::error::{MediaError, MediaResult};
use crate::object::{ChunkStream, MediaMetadata};

/// Encode raw bytes as `data:<content_type>;base64,<payload>`.
pub fn encode(content_type: &str, data: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(data))
}

/// Split a base64 data URL back into its content type and bytes.
///
/// Returns `None` for anything that is not a well-formed base64 data URL.
pub fn decode(data_url: &str) -> Option<(String, Vec<u8>)> {
    let rest = data_url.strip_prefix("data:")?;
    let (content_type, payload) = rest.split_once(";base64,")?;
    let data = STANDARD.decode(payload).ok()?;
    Some((content_type.to_string(), data))
}

/// Drain a chunk stream and encode the complete object as a data URL.
///
/// Chunks must arrive numbered `0, 1, 2, ...` and add up to exactly
/// `metadata.length` bytes. Nothing is encoded until the stream has ended;
/// any stream error or integrity violation fails the whole read.
pub async fn assemble(metadata: &MediaMetadata, mut chunks: ChunkStream) -> MediaResult<String> {
    if metadata.content_type.is_empty() {
        return Err(MediaError::storage(metadata.id, "metadata has no content type"));
    }

    let mut parts: Vec<Bytes> = Vec::new();
    let mut received: u64 = 0;
    let mut expected_n: u32 = 0;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        if chunk.n != expected_n {
            return Err(MediaError::storage(
                metadata.id,
                format!("expected chunk {expected_n}, got chunk {}", chunk.n),
            ));
        }
        received += chunk.data.len() as u64;
        if received > metadata.length {
            return Err(MediaError::storage(
                metadata.id,
                format!("chunks exceed recorded length of {} bytes", metadata.length),
            ));
        }
        parts.push(chunk.data);
        expected_n += 1;
    }

    if received != metadata.length {
        return Err(MediaError::storage(
            metadata.id,
            format!(
                "stream ended after {received} of {} bytes",
                metadata.length
            ),
        ));
    }

    let buffer = parts.concat();
    Ok(encode(&metadata.content_type, &buffer))
}
