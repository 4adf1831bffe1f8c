use std::sync::Arc;

use clientele_crypto::{CredentialManager, SigningKey, SubjectClaims};
use clientele_media::{MediaStore, Upload};
use clientele_profile::{
    normalize_email, ClientRepository, NewClient, ProfileError, ProfilePatch, ProfileStore,
};
use clientele_types::{ClientId, ClientRecord, ImageRef, MediaId, ProfileView, VerifiedIdentity};

use crate::assembler::ProfileAssembler;
use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, LifecycleResult};
use crate::identity::{IdentityVerifier, ProviderCredentials};
use crate::picture::{check_image_content_type, PictureSlot};

/// Self-service sign-up input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Defaults to "first last" when absent or blank.
    pub display_name: Option<String>,
}

impl Registration {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// A successful registration: the new record's id and a bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub client_id: ClientId,
    pub token: String,
}

impl std::fmt::Debug for RegistrationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationOutcome")
            .field("client_id", &self.client_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// The client identity and profile-media facade.
#[derive(Clone)]
pub struct ClientLifecycle {
    pub(crate) profiles: ProfileStore,
    pub(crate) media: Arc<dyn MediaStore>,
    credentials: Arc<CredentialManager>,
    assembler: ProfileAssembler,
    pub(crate) orphan_grace: chrono::Duration,
}

impl ClientLifecycle {
    pub fn new(
        profiles: ProfileStore,
        media: Arc<dyn MediaStore>,
        credentials: Arc<CredentialManager>,
    ) -> Self {
        let assembler = ProfileAssembler::new(Arc::clone(&media));
        Self {
            profiles,
            media,
            credentials,
            assembler,
            orphan_grace: LifecycleConfig::default().orphan_grace(),
        }
    }

    /// Wire a facade from configuration and backends.
    pub fn from_config(
        config: &LifecycleConfig,
        repo: Arc<dyn ClientRepository>,
        media: Arc<dyn MediaStore>,
        signing_key: SigningKey,
    ) -> LifecycleResult<Self> {
        config.validate()?;
        let credentials = Arc::new(config.credential_manager(signing_key)?);
        let profiles = ProfileStore::new(repo, Arc::clone(&credentials));
        Ok(Self::new(profiles, media, credentials).with_orphan_grace(config.orphan_grace()))
    }

    /// Minimum age before [`reconcile`](Self::reconcile) deletes an
    /// unreferenced media object.
    pub fn with_orphan_grace(mut self, grace: chrono::Duration) -> Self {
        self.orphan_grace = grace;
        self
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    // ---- Identity ----

    /// Create a password-backed account and issue its first token.
    ///
    /// A taken email fails with [`LifecycleError::EmailExists`] and no token.
    pub async fn register(&self, registration: Registration) -> LifecycleResult<RegistrationOutcome> {
        let email = normalize_email(&registration.email);
        if email.is_empty() {
            return Err(LifecycleError::InvalidInput("email is required".into()));
        }
        if registration.password.is_empty() {
            return Err(LifecycleError::InvalidInput("password is required".into()));
        }
        let first_name = registration.first_name.trim().to_string();
        let last_name = registration.last_name.trim().to_string();
        let display_name = registration
            .display_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("{first_name} {last_name}").trim().to_string());

        let record = self
            .profiles
            .create(NewClient {
                email,
                password: registration.password,
                display_name,
                first_name,
                last_name,
            })
            .await?;
        let token = self.issue_token(&record.id, &record.email)?;
        tracing::info!(client_id = %record.id, "registered client");
        Ok(RegistrationOutcome {
            client_id: record.id,
            token,
        })
    }

    /// Check an email/password pair and return the account's profile.
    ///
    /// An unknown email is `NotFound`; a wrong password, or an account with
    /// no password at all, is `AuthenticationFailed`.
    pub async fn authenticate_password(
        &self,
        email: &str,
        password: &str,
    ) -> LifecycleResult<ProfileView> {
        let record = self.profiles.find_by_email(email).await?;
        let Some(digest) = record.password.as_ref() else {
            tracing::debug!(client_id = %record.id, "password sign-in on a password-less account");
            return Err(LifecycleError::AuthenticationFailed(record.email));
        };
        if !self.credentials.verify(password, &digest.hash)? {
            tracing::debug!(client_id = %record.id, "password mismatch");
            return Err(LifecycleError::AuthenticationFailed(record.email));
        }
        Ok(self.assembler.assemble(&record).await)
    }

    /// Issue a bearer token for an already authenticated profile.
    pub fn login(&self, view: &ProfileView) -> LifecycleResult<String> {
        self.issue_token(&view.user_id, &view.email)
    }

    /// Find or create the account for a verified third-party identity.
    ///
    /// Lookup is by social id first. Failing that, an account that already
    /// owns the identity's email gets the social id linked onto it, unless it
    /// is linked to a different identity, which is `EmailExists`. Otherwise a
    /// password-less account with the placeholder picture is created.
    pub async fn validate_social_identity(
        &self,
        identity: &VerifiedIdentity,
    ) -> LifecycleResult<ClientRecord> {
        if identity.social_id.trim().is_empty() {
            return Err(LifecycleError::InvalidInput("social id is required".into()));
        }

        match self.profiles.find_by_social_id(&identity.social_id).await {
            Ok(record) => return Ok(record),
            Err(ProfileError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        match self.profiles.find_by_email(&identity.email).await {
            Ok(existing) if existing.social_id.is_some() => {
                tracing::debug!(client_id = %existing.id, "email already linked to another social identity");
                return Err(LifecycleError::EmailExists(existing.email));
            }
            Ok(existing) => {
                let record = self
                    .profiles
                    .link_social_id(&existing.id, &identity.social_id)
                    .await?;
                tracing::info!(client_id = %record.id, "linked social identity to existing account");
                return Ok(record);
            }
            Err(ProfileError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let record = self.profiles.create_social(identity).await?;
        tracing::info!(client_id = %record.id, "created account from social identity");
        Ok(record)
    }

    /// Verify provider credentials, then find or create the account.
    pub async fn sign_in_with(
        &self,
        verifier: &dyn IdentityVerifier,
        credentials: &ProviderCredentials,
    ) -> LifecycleResult<ClientRecord> {
        let identity = verifier.verify(credentials).await?;
        tracing::debug!(provider = verifier.provider(), "identity verified");
        self.validate_social_identity(&identity).await
    }

    // ---- Profile ----

    pub async fn get_profile(&self, id: &ClientId) -> LifecycleResult<ProfileView> {
        let record = self.profiles.find_by_id(id).await?;
        Ok(self.assembler.assemble(&record).await)
    }

    /// Apply a partial update and return the refreshed profile.
    pub async fn update_profile(
        &self,
        id: &ClientId,
        patch: ProfilePatch,
    ) -> LifecycleResult<ProfileView> {
        if patch.password.as_deref() == Some("") {
            return Err(LifecycleError::InvalidInput("password must not be empty".into()));
        }
        let record = if patch.is_empty() {
            self.profiles.find_by_id(id).await?
        } else {
            self.profiles.update(id, patch).await?
        };
        Ok(self.assembler.assemble(&record).await)
    }

    // ---- Pictures ----

    /// Store a new picture and point the record at it.
    ///
    /// Any previous custom picture is deleted best-effort once the record
    /// has moved. If the record disappears while the upload is stored, the
    /// new object is deleted again and `NotFound` is returned.
    pub async fn set_picture(
        &self,
        id: &ClientId,
        upload: Upload,
    ) -> LifecycleResult<MediaId> {
        check_image_content_type(&upload.content_type)?;
        let record = self.profiles.find_by_id(id).await?;
        let previous = PictureSlot::of(&record);

        let new_id = self.media.store(upload).await?;
        if let Err(e) = self.profiles.set_image(id, ImageRef::Media(new_id)).await {
            self.media.delete(&new_id).await;
            return Err(e.into());
        }
        tracing::info!(client_id = %id, media_id = %new_id, "profile picture set");

        if let PictureSlot::HasCustomImage(old) = previous {
            if !self.media.delete(&old).await {
                tracing::warn!(client_id = %id, media_id = %old, "previous picture was not deleted");
            }
        }
        Ok(new_id)
    }

    /// Drop the custom picture and reset the record to the placeholder.
    ///
    /// Returns whether the media object was deleted. The record is reset
    /// even when the delete fails. Without a custom picture this is a
    /// no-op returning `true`.
    pub async fn delete_picture(&self, id: &ClientId) -> LifecycleResult<bool> {
        let record = self.profiles.find_by_id(id).await?;
        let PictureSlot::HasCustomImage(old) = PictureSlot::of(&record) else {
            return Ok(true);
        };

        let deleted = self.media.delete(&old).await;
        self.profiles.set_image(id, ImageRef::Placeholder).await?;
        if deleted {
            tracing::info!(client_id = %id, media_id = %old, "profile picture deleted");
        } else {
            tracing::warn!(
                client_id = %id,
                media_id = %old,
                "profile picture reset but media object was not deleted"
            );
        }
        Ok(deleted)
    }

    // ---- Accounts ----

    /// Delete an account and its picture.
    ///
    /// Returns `false`, without touching the media store, if no such account
    /// exists.
    pub async fn delete_account(&self, id: &ClientId) -> LifecycleResult<bool> {
        let record = match self.profiles.find_by_id(id).await {
            Ok(record) => record,
            Err(ProfileError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if let Some(media_id) = record.image.media_id() {
            if !self.media.delete(&media_id).await {
                tracing::warn!(client_id = %id, media_id = %media_id, "picture of deleted account was not removed");
            }
        }
        let removed = self.profiles.delete(id).await?;
        if removed {
            tracing::info!(client_id = %id, "account deleted");
        }
        Ok(removed)
    }

    fn issue_token(&self, id: &ClientId, username: &str) -> LifecycleResult<String> {
        Ok(self
            .credentials
            .issue_token(&SubjectClaims::new(*id, username))?)
    }
}

impl std::fmt::Debug for ClientLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientLifecycle")
            .field("orphan_grace", &self.orphan_grace)
            .finish_non_exhaustive()
    }
}
