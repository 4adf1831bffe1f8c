use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::MediaId;

/// Placeholder picture for records without a custom image.
///
/// Every record without a custom picture stores exactly this string.
pub const DEFAULT_AVATAR_URL: &str =
    "https://www.gravatar.com/avatar/00000000000000000000000000000000?d=mp&f=y";

/// The picture slot of a client record.
///
/// Persisted as a plain string: the sentinel URL for [`ImageRef::Placeholder`]
/// or the media id for [`ImageRef::Media`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ImageRef {
    /// No custom picture; the sentinel URL.
    #[default]
    Placeholder,
    /// A picture held by the media store.
    Media(MediaId),
}

impl ImageRef {
    /// The media id, if a custom picture is set.
    pub fn media_id(&self) -> Option<MediaId> {
        match self {
            Self::Placeholder => None,
            Self::Media(id) => Some(*id),
        }
    }

    /// Returns `true` for the sentinel placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// Parse the persisted string form.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        if value == DEFAULT_AVATAR_URL {
            return Ok(Self::Placeholder);
        }
        value.parse().map(Self::Media)
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => write!(f, "ImageRef::Placeholder"),
            Self::Media(id) => write!(f, "ImageRef::Media({})", id.short_id()),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => write!(f, "{DEFAULT_AVATAR_URL}"),
            Self::Media(id) => write!(f, "{id}"),
        }
    }
}

impl From<ImageRef> for String {
    fn from(image: ImageRef) -> Self {
        image.to_string()
    }
}

impl TryFrom<String> for ImageRef {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MediaId> for ImageRef {
    fn from(id: MediaId) -> Self {
        Self::Media(id)
    }
}

/// A picture slot after media resolution.
///
/// Resolution failures are carried as their own variants rather than being
/// replaced by the placeholder, so that lost media stays visible to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResolvedImage {
    /// The record has no custom picture.
    #[serde(rename_all = "camelCase")]
    Placeholder { url: String },
    /// The stored picture, inlined as `data:<contentType>;base64,<payload>`.
    #[serde(rename_all = "camelCase")]
    DataUrl { data_url: String },
    /// The record references a media object that no longer exists.
    #[serde(rename_all = "camelCase")]
    Missing { media_id: MediaId },
    /// The media object exists but could not be read.
    #[serde(rename_all = "camelCase")]
    Unavailable { media_id: MediaId, reason: String },
}

impl ResolvedImage {
    /// The placeholder variant with the sentinel URL.
    pub fn placeholder() -> Self {
        Self::Placeholder {
            url: DEFAULT_AVATAR_URL.to_string(),
        }
    }

    /// The displayable URL (sentinel or data URL), if resolution succeeded.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Placeholder { url } => Some(url),
            Self::DataUrl { data_url } => Some(data_url),
            Self::Missing { .. } | Self::Unavailable { .. } => None,
        }
    }

    /// Returns `true` if the referenced media could not be resolved.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Missing { .. } | Self::Unavailable { .. })
    }
}
