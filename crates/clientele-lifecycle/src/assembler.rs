use std::sync::Arc;

use clientele_media::{MediaError, MediaStore};
use clientele_types::{ClientRecord, ImageRef, ProfileView, ResolvedImage};

/// Builds caller-facing profile views, inlining stored pictures.
#[derive(Clone)]
pub struct ProfileAssembler {
    media: Arc<dyn MediaStore>,
}

impl ProfileAssembler {
    pub fn new(media: Arc<dyn MediaStore>) -> Self {
        Self { media }
    }

    /// Resolve a picture slot.
    ///
    /// The placeholder never touches the media store. A missing object
    /// becomes [`ResolvedImage::Missing`] and any other read failure
    /// [`ResolvedImage::Unavailable`]; neither falls back to the placeholder.
    pub async fn resolve_image(&self, image: ImageRef) -> ResolvedImage {
        let media_id = match image {
            ImageRef::Placeholder => return ResolvedImage::placeholder(),
            ImageRef::Media(id) => id,
        };
        match self.media.read_data_url(&media_id).await {
            Ok(data_url) => ResolvedImage::DataUrl { data_url },
            Err(MediaError::NotFound(_)) => {
                tracing::warn!(media_id = %media_id, "profile picture is missing from the media store");
                ResolvedImage::Missing { media_id }
            }
            Err(e) => {
                tracing::warn!(media_id = %media_id, error = %e, "profile picture could not be read");
                ResolvedImage::Unavailable {
                    media_id,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn assemble(&self, record: &ClientRecord) -> ProfileView {
        let image = self.resolve_image(record.image).await;
        ProfileView::from_record(record, image)
    }
}

impl std::fmt::Debug for ProfileAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileAssembler").finish_non_exhaustive()
    }
}
