use crate::error::{CredentialError, CredentialResult};

/// Ed25519 signing key used to sign bearer tokens (private).
pub struct SigningKey(ed25519_dalek::SigningKey);

/// Ed25519 verifying key (public).
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

/// Ed25519 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl SigningKey {
    /// Generate a new random signing key.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Create from raw 32-byte secret.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    /// Parse a hex-encoded 32-byte secret, as kept in deployment secrets.
    pub fn from_hex(secret: &str) -> CredentialResult<Self> {
        let bytes = hex::decode(secret.trim()).map_err(|_| CredentialError::InvalidKey)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| CredentialError::InvalidKey)?;
        Ok(Self::from_bytes(arr))
    }

    /// The corresponding public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer;
        Signature(self.0.sign(message))
    }
}

impl VerifyingKey {
    /// Verify a signature on a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> CredentialResult<()> {
        use ed25519_dalek::Verifier;
        self.0
            .verify(message, &signature.0)
            .map_err(|_| CredentialError::InvalidSignature)
    }

    /// Raw public key bytes.
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Create from raw 32-byte public key.
    pub fn from_bytes(bytes: [u8; 32]) -> CredentialResult<Self> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|_| CredentialError::InvalidKey)?;
        Ok(Self(key))
    }
}

impl Signature {
    /// Raw 64-byte signature.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }

    /// Parse a raw signature, rejecting anything but 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> CredentialResult<Self> {
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CredentialError::InvalidSignature)?;
        Ok(Self(ed25519_dalek::Signature::from_bytes(&arr)))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKey(<redacted>)")
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({})", hex::encode(self.0.to_bytes()))
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.0.to_bytes()[..8]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let sk = SigningKey::generate();
        let sig = sk.sign(b"header.payload");
        assert!(sk.verifying_key().verify(b"header.payload", &sig).is_ok());
    }

    #[test]
    fn verify_fails_with_wrong_key() {
        let sig = SigningKey::generate().sign(b"message");
        let other = SigningKey::generate().verifying_key();
        assert_eq!(
            other.verify(b"message", &sig),
            Err(CredentialError::InvalidSignature)
        );
    }

    #[test]
    fn from_hex_roundtrip() {
        let secret = hex::encode([7u8; 32]);
        let a = SigningKey::from_hex(&secret).unwrap();
        let b = SigningKey::from_bytes([7u8; 32]);
        assert_eq!(a.verifying_key(), b.verifying_key());
    }

    #[test]
    fn from_hex_rejects_short_secret() {
        let err = SigningKey::from_hex("abcd").unwrap_err();
        assert_eq!(err, CredentialError::InvalidKey);
    }

    #[test]
    fn signature_slice_roundtrip() {
        let sig = SigningKey::generate().sign(b"m");
        let parsed = Signature::from_slice(&sig.to_bytes()).unwrap();
        assert_eq!(sig, parsed);
        assert!(Signature::from_slice(&[0u8; 10]).is_err());
    }

    #[test]
    fn debug_redacts_signing_key() {
        let sk = SigningKey::generate();
        assert!(format!("{sk:?}").contains("redacted"));
    }
}
