//! Inputs accepted by the profile store.

use clientele_types::{ClientRecord, ImageRef, PasswordDigest};

/// Canonical form of an email used as a login key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Fields needed to create a password-backed client record.
#[derive(Clone, PartialEq, Eq)]
pub struct NewClient {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
}

impl std::fmt::Debug for NewClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewClient")
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// A caller-supplied partial profile update. Unset fields are left alone.
///
/// The picture slot, admin flag, and roles are not editable here.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ProfilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.display_name.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}

impl std::fmt::Debug for ProfilePatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfilePatch")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("display_name", &self.display_name)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// A repository-level update, with any password already hashed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub email: Option<String>,
    pub password: Option<PasswordDigest>,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub social_id: Option<String>,
    pub image: Option<ImageRef>,
}

impl RecordPatch {
    /// A patch that only moves the picture slot.
    pub fn image(image: ImageRef) -> Self {
        Self {
            image: Some(image),
            ..Default::default()
        }
    }

    /// A patch that only links a social identity.
    pub fn social_id(social_id: impl Into<String>) -> Self {
        Self {
            social_id: Some(social_id.into()),
            ..Default::default()
        }
    }

    /// Merge the supplied fields into `record` and bump `updated_at`.
    pub fn apply(&self, record: &mut ClientRecord) {
        if let Some(email) = &self.email {
            record.email = email.clone();
        }
        if let Some(password) = &self.password {
            record.password = Some(password.clone());
        }
        if let Some(display_name) = &self.display_name {
            record.display_name = display_name.clone();
        }
        if let Some(first_name) = &self.first_name {
            record.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            record.last_name = last_name.clone();
        }
        if let Some(social_id) = &self.social_id {
            record.social_id = Some(social_id.clone());
        }
        if let Some(image) = self.image {
            record.image = image;
        }
        record.touch();
    }
}
