use std::sync::Arc;

use clientele_crypto::CredentialManager;
use clientele_types::{ClientId, ClientRecord, ImageRef, MediaId, VerifiedIdentity};

use crate::error::{LookupKey, ProfileError, ProfileResult};
use crate::input::{normalize_email, NewClient, ProfilePatch, RecordPatch};
use crate::traits::ClientRepository;

/// Client record CRUD with password hashing and typed lookup failures.
#[derive(Clone)]
pub struct ProfileStore {
    repo: Arc<dyn ClientRepository>,
    credentials: Arc<CredentialManager>,
}

impl ProfileStore {
    pub fn new(repo: Arc<dyn ClientRepository>, credentials: Arc<CredentialManager>) -> Self {
        Self { repo, credentials }
    }

    /// Create a password-backed record.
    ///
    /// Fails with `EmailExists` if any record already uses the email. The
    /// existence check runs before hashing so duplicates are cheap to reject;
    /// the repository insert re-checks atomically.
    pub async fn create(&self, input: NewClient) -> ProfileResult<ClientRecord> {
        let email = normalize_email(&input.email);
        if email.is_empty() {
            return Err(ProfileError::InvalidInput("email is required".into()));
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(ProfileError::EmailExists(email));
        }

        let digest = self.credentials.hash(&input.password)?;
        let record = ClientRecord::new(email, input.display_name, input.first_name, input.last_name)
            .with_password(digest);
        let record = self.repo.insert(record).await?;
        tracing::info!(client_id = %record.id, "created client record");
        Ok(record)
    }

    /// Create a password-less record from a verified third-party identity.
    pub async fn create_social(&self, identity: &VerifiedIdentity) -> ProfileResult<ClientRecord> {
        let email = normalize_email(&identity.email);
        if email.is_empty() {
            return Err(ProfileError::InvalidInput("email is required".into()));
        }
        if identity.social_id.is_empty() {
            return Err(ProfileError::InvalidInput("social id is required".into()));
        }
        let first_name = identity.first_name.trim();
        let last_name = identity.last_name.trim();
        let display_name = format!("{first_name} {last_name}").trim().to_string();
        let record = ClientRecord::new(email, display_name, first_name, last_name)
        .with_social_id(identity.social_id.clone());
        let record = self.repo.insert(record).await?;
        tracing::info!(client_id = %record.id, "created client record from social identity");
        Ok(record)
    }

    pub async fn find_by_id(&self, id: &ClientId) -> ProfileResult<ClientRecord> {
        self.repo
            .get(id)
            .await?
            .ok_or(ProfileError::NotFound(LookupKey::Id(*id)))
    }

    pub async fn find_by_email(&self, email: &str) -> ProfileResult<ClientRecord> {
        let email = normalize_email(email);
        self.repo
            .find_by_email(&email)
            .await?
            .ok_or(ProfileError::NotFound(LookupKey::Email(email)))
    }

    pub async fn find_by_social_id(&self, social_id: &str) -> ProfileResult<ClientRecord> {
        self.repo
            .find_by_social_id(social_id)
            .await?
            .ok_or_else(|| ProfileError::NotFound(LookupKey::SocialId(social_id.to_string())))
    }

    /// Merge the supplied fields and return the post-update record.
    ///
    /// A new email is normalized and must not belong to another record; a
    /// new password is hashed before it reaches the repository.
    pub async fn update(&self, id: &ClientId, patch: ProfilePatch) -> ProfileResult<ClientRecord> {
        let email = match patch.email {
            Some(email) => {
                let email = normalize_email(&email);
                if email.is_empty() {
                    return Err(ProfileError::InvalidInput("email must not be empty".into()));
                }
                Some(email)
            }
            None => None,
        };
        let password = patch
            .password
            .map(|password| self.credentials.hash(&password))
            .transpose()?;

        let record_patch = RecordPatch {
            email,
            password,
            display_name: patch.display_name,
            first_name: patch.first_name,
            last_name: patch.last_name,
            ..Default::default()
        };
        self.apply(id, &record_patch).await
    }

    /// Point the record's picture slot at `image`.
    pub async fn set_image(&self, id: &ClientId, image: ImageRef) -> ProfileResult<ClientRecord> {
        self.apply(id, &RecordPatch::image(image)).await
    }

    /// Attach a third-party identity to an existing record.
    pub async fn link_social_id(
        &self,
        id: &ClientId,
        social_id: &str,
    ) -> ProfileResult<ClientRecord> {
        self.apply(id, &RecordPatch::social_id(social_id)).await
    }

    /// Delete a record. Returns `false` if it did not exist.
    pub async fn delete(&self, id: &ClientId) -> ProfileResult<bool> {
        let removed = self.repo.remove(id).await?.is_some();
        if removed {
            tracing::info!(client_id = %id, "deleted client record");
        }
        Ok(removed)
    }

    /// Every record's custom picture id.
    pub async fn image_refs(&self) -> ProfileResult<Vec<(ClientId, MediaId)>> {
        Ok(self
            .repo
            .list()
            .await?
            .into_iter()
            .filter_map(|r| r.image.media_id().map(|media| (r.id, media)))
            .collect())
    }

    /// The credential manager passwords are hashed with.
    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    async fn apply(&self, id: &ClientId, patch: &RecordPatch) -> ProfileResult<ClientRecord> {
        let record = self
            .repo
            .update(id, patch)
            .await?
            .ok_or(ProfileError::NotFound(LookupKey::Id(*id)))?;
        tracing::debug!(client_id = %id, "updated client record");
        Ok(record)
    }
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore").finish_non_exhaustive()
    }
}
