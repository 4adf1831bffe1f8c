use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use clientele_crypto::{CredentialManager, Ed25519TokenIssuer, PasswordPolicy, SigningKey};
use clientele_media::MediaLimits;

use crate::error::{LifecycleError, LifecycleResult};

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Tunables for the lifecycle stack, loadable from TOML.
///
/// ```toml
/// token_ttl_secs = 3600
/// orphan_grace_secs = 900
///
/// [password]
/// memory_kib = 19456
/// iterations = 2
/// parallelism = 1
///
/// [media]
/// chunk_size = 261120
/// max_upload_bytes = 16777216
/// ```
///
/// Every field is optional; missing ones take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub password: PasswordPolicy,
    pub media: MediaLimits,
    /// Lifetime of issued bearer tokens.
    pub token_ttl_secs: u64,
    /// Minimum age before an unreferenced media object is swept.
    pub orphan_grace_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            password: PasswordPolicy::default(),
            media: MediaLimits::default(),
            token_ttl_secs: 60 * 60,
            orphan_grace_secs: 15 * 60,
        }
    }
}

impl LifecycleConfig {
    pub fn from_toml_str(source: &str) -> LifecycleResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| LifecycleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> LifecycleResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| LifecycleError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded lifecycle config");
        Ok(config)
    }

    pub fn validate(&self) -> LifecycleResult<()> {
        if self.token_ttl_secs == 0 {
            return Err(LifecycleError::Config("token_ttl_secs must be positive".into()));
        }
        if self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(LifecycleError::Config(format!(
                "token_ttl_secs must not exceed {MAX_TOKEN_TTL_SECS}"
            )));
        }
        self.media
            .validate()
            .map_err(|e| LifecycleError::Config(e.to_string()))
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(clamp_secs(self.token_ttl_secs))
    }

    pub fn orphan_grace(&self) -> chrono::Duration {
        chrono::Duration::seconds(clamp_secs(self.orphan_grace_secs))
    }

    /// Build a credential manager that signs tokens with `signing_key`.
    pub fn credential_manager(&self, signing_key: SigningKey) -> LifecycleResult<CredentialManager> {
        let issuer = Arc::new(Ed25519TokenIssuer::new(signing_key, self.token_ttl()));
        Ok(CredentialManager::new(self.password, issuer)?)
    }
}

// chrono durations top out at i64::MAX milliseconds.
fn clamp_secs(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX).min(i64::MAX / 1000)
}
