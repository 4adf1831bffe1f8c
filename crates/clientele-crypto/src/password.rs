use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use argon2::{PasswordHasher as _, PasswordVerifier as _};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use clientele_types::PasswordDigest;

use crate::error::{CredentialError, CredentialResult};

/// Length of freshly generated salts, in bytes.
const SALT_LEN: usize = 16;

/// Cost parameters for argon2id password hashing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordPolicy {
    /// The cheapest parameters argon2 accepts. Only suitable for tests.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }

    fn params(&self) -> CredentialResult<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| CredentialError::InvalidPolicy(e.to_string()))
    }
}

/// Salted argon2id password hasher.
///
/// Verification reads the cost parameters from the stored PHC string, so
/// hashes produced under an older policy keep verifying after the policy
/// changes.
pub struct PasswordHasher {
    argon: Argon2<'static>,
    policy: PasswordPolicy,
}

impl PasswordHasher {
    /// Create a hasher, rejecting cost parameters argon2 does not accept.
    pub fn new(policy: PasswordPolicy) -> CredentialResult<Self> {
        let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, policy.params()?);
        Ok(Self { argon, policy })
    }

    /// The policy new hashes are produced with.
    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    /// Hash a password under a freshly generated random salt.
    pub fn hash(&self, password: &str) -> CredentialResult<PasswordDigest> {
        if password.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        let hash = self
            .argon
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        Ok(PasswordDigest {
            hash: hash.to_string(),
            salt: salt.as_str().to_string(),
        })
    }

    /// Check a password against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch. The comparison of derived outputs is
    /// constant-time.
    pub fn verify(&self, password: &str, hash: &str) -> CredentialResult<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;
        match self.argon.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::Hashing(e.to_string())),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(PasswordPolicy::minimal()).unwrap()
    }

    #[test]
    fn hash_and_verify() {
        let h = hasher();
        let digest = h.hash("secret").unwrap();
        assert!(digest.hash.starts_with("$argon2id$"));
        assert!(digest.hash.contains(&digest.salt));
        assert!(h.verify("secret", &digest.hash).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let h = hasher();
        let digest = h.hash("secret").unwrap();
        assert_eq!(h.verify("other", &digest.hash), Ok(false));
    }

    #[test]
    fn salts_are_fresh() {
        let h = hasher();
        let a = h.hash("secret").unwrap();
        let b = h.hash("secret").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn empty_password_rejected() {
        assert_eq!(hasher().hash(""), Err(CredentialError::EmptyPassword));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let err = hasher().verify("secret", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, CredentialError::MalformedHash(_)));
    }

    #[test]
    fn invalid_policy_rejected() {
        let policy = PasswordPolicy {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        let err = PasswordHasher::new(policy).unwrap_err();
        assert!(matches!(err, CredentialError::InvalidPolicy(_)));
    }

    #[test]
    fn hashes_verify_after_policy_change() {
        let old = hasher();
        let digest = old.hash("secret").unwrap();
        let stronger = PasswordHasher::new(PasswordPolicy {
            memory_kib: 64,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(stronger.verify("secret", &digest.hash).unwrap());
    }

    #[test]
    fn debug_omits_secrets() {
        let debug = format!("{:?}", hasher());
        assert!(debug.contains("PasswordHasher"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn verify_accepts_only_the_hashed_password(
            password in "[ -~]{1,32}",
            other in "[ -~]{1,32}",
        ) {
            let h = hasher();
            let digest = h.hash(&password).unwrap();
            prop_assert!(h.verify(&password, &digest.hash).unwrap());
            if other != password {
                prop_assert!(!h.verify(&other, &digest.hash).unwrap());
            }
        }
    }
}
