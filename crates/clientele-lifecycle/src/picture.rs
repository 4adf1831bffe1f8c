use clientele_types::{ClientRecord, ImageRef, MediaId};

use crate::error::{LifecycleError, LifecycleResult};

/// Picture state of one client record.
///
/// `set_picture` moves any state to `HasCustomImage`; `delete_picture`
/// moves any state to `NoCustomImage`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PictureSlot {
    NoCustomImage,
    HasCustomImage(MediaId),
}

impl PictureSlot {
    pub fn of(record: &ClientRecord) -> Self {
        Self::from(record.image)
    }

    pub fn media_id(&self) -> Option<MediaId> {
        match self {
            Self::NoCustomImage => None,
            Self::HasCustomImage(id) => Some(*id),
        }
    }
}

impl From<ImageRef> for PictureSlot {
    fn from(image: ImageRef) -> Self {
        match image {
            ImageRef::Placeholder => Self::NoCustomImage,
            ImageRef::Media(id) => Self::HasCustomImage(id),
        }
    }
}

/// Accept only `image/<subtype>` content types.
pub(crate) fn check_image_content_type(content_type: &str) -> LifecycleResult<()> {
    let subtype = content_type
        .trim()
        .get(..6)
        .filter(|prefix| prefix.eq_ignore_ascii_case("image/"))
        .and_then(|_| content_type.trim().get(6..));
    match subtype {
        Some(subtype) if !subtype.is_empty() => Ok(()),
        _ => Err(LifecycleError::InvalidInput(format!(
            "picture content type must be image/*, got {content_type:?}"
        ))),
    }
}
