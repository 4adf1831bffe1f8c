use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ClientId;
use crate::image::ImageRef;

/// Role granted to every newly created client.
pub const DEFAULT_ROLE: &str = "user";

/// A derived password hash and the salt it was derived with.
///
/// `hash` is a self-describing PHC string; `salt` is kept alongside it to
/// match the persisted schema. Neither value ever leaves the credential
/// and profile layers.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordDigest {
    pub hash: String,
    pub salt: String,
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordDigest(<redacted>)")
    }
}

/// Persisted identity and profile document.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: ClientId,
    /// Login key; unique across all records, stored lowercase.
    pub email: String,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    /// `None` for accounts created through a third-party identity.
    pub password: Option<PasswordDigest>,
    pub social_id: Option<String>,
    pub image: ImageRef,
    pub is_admin: bool,
    pub roles: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientRecord {
    /// Create a fresh record with the placeholder picture and default role.
    pub fn new(
        email: impl Into<String>,
        display_name: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            email: email.into(),
            display_name: display_name.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: None,
            social_id: None,
            image: ImageRef::Placeholder,
            is_admin: false,
            roles: BTreeSet::from([DEFAULT_ROLE.to_string()]),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_password(mut self, digest: PasswordDigest) -> Self {
        self.password = Some(digest);
        self
    }

    pub fn with_social_id(mut self, social_id: impl Into<String>) -> Self {
        self.social_id = Some(social_id.into());
        self
    }

    /// Returns `true` if the record can sign in with a password.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Debug for ClientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("has_password", &self.has_password())
            .field("social_id", &self.social_id)
            .field("image", &self.image)
            .field("is_admin", &self.is_admin)
            .field("roles", &self.roles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest() -> PasswordDigest {
        PasswordDigest {
            hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".into(),
            salt: "c2FsdA".into(),
        }
    }

    #[test]
    fn new_record_defaults() {
        let record = ClientRecord::new("a@x.com", "A X", "A", "X");
        assert!(record.image.is_placeholder());
        assert!(!record.is_admin);
        assert!(!record.has_password());
        assert!(record.roles.contains(DEFAULT_ROLE));
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn builder_sets_credentials() {
        let record = ClientRecord::new("a@x.com", "A X", "A", "X")
            .with_password(digest())
            .with_social_id("google-123");
        assert!(record.has_password());
        assert_eq!(record.social_id.as_deref(), Some("google-123"));
    }

    #[test]
    fn debug_redacts_password() {
        let record = ClientRecord::new("a@x.com", "A X", "A", "X").with_password(digest());
        let debug = format!("{record:?}");
        assert!(!debug.contains("argon2id"));
        assert!(!debug.contains("c2FsdA"));
        assert!(format!("{:?}", digest()).contains("redacted"));
    }

    #[test]
    fn serde_uses_camel_case() {
        let record = ClientRecord::new("a@x.com", "A X", "A", "X");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["displayName"], "A X");
        assert_eq!(value["isAdmin"], false);
        assert_eq!(value["image"], crate::DEFAULT_AVATAR_URL);
        let back: ClientRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn touch_advances_updated_at() {
        let mut record = ClientRecord::new("a@x.com", "A X", "A", "X");
        let before = record.updated_at;
        record.touch();
        assert!(record.updated_at >= before);
    }
}
