//! Bearer token issuance.
//!
//! Tokens are RFC 7519 JWTs signed with Ed25519:
//! - Header: `{"alg":"EdDSA","typ":"JWT"}`
//! - Payload: [`TokenClaims`] (`sub`, `username`, `iat`, `exp`)
//! - Signature: Ed25519 over `base64url(header).base64url(payload)`

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use clientele_types::ClientId;

use crate::error::{CredentialError, CredentialResult};
use crate::signer::{Signature, SigningKey, VerifyingKey};

const JWT_HEADER: &str = r#"{"alg":"EdDSA","typ":"JWT"}"#;

/// The identity a token is issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectClaims {
    pub subject_id: ClientId,
    pub username: String,
}

impl SubjectClaims {
    pub fn new(subject_id: ClientId, username: impl Into<String>) -> Self {
        Self {
            subject_id,
            username: username.into(),
        }
    }
}

/// Claims embedded in an issued token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: ClientId,
    pub username: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl TokenClaims {
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Produces signed, opaque bearer strings from subject claims.
///
/// Expiry and key management belong to the implementation.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token for the subject.
    fn issue(&self, subject: &SubjectClaims) -> CredentialResult<String>;

    /// Check a token's signature and expiry, returning its claims.
    fn verify(&self, token: &str) -> CredentialResult<TokenClaims>;
}

/// EdDSA JWT issuer with a fixed time-to-live.
#[derive(Debug)]
pub struct Ed25519TokenIssuer {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    ttl: Duration,
}

impl Ed25519TokenIssuer {
    pub fn new(signing_key: SigningKey, ttl: Duration) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
            ttl,
        }
    }

    /// The public key tokens can be checked against elsewhere.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    fn encode(&self, claims: &TokenClaims) -> CredentialResult<String> {
        let payload = serde_json::to_vec(claims)
            .map_err(|e| CredentialError::TokenEncoding(e.to_string()))?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(JWT_HEADER),
            URL_SAFE_NO_PAD.encode(payload)
        );
        let signature = self.signing_key.sign(signing_input.as_bytes());
        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        ))
    }
}

impl TokenIssuer for Ed25519TokenIssuer {
    fn issue(&self, subject: &SubjectClaims) -> CredentialResult<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| CredentialError::TokenEncoding("token expiry out of range".into()))?;
        let claims = TokenClaims {
            sub: subject.subject_id,
            username: subject.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = self.encode(&claims)?;
        tracing::debug!(client_id = %subject.subject_id, exp = claims.exp, "issued bearer token");
        Ok(token)
    }

    fn verify(&self, token: &str) -> CredentialResult<TokenClaims> {
        let parts: Vec<&str> = token.split('.').collect();
        let [header_b64, payload_b64, signature_b64] = parts.as_slice() else {
            return Err(CredentialError::InvalidToken("expected three segments".into()));
        };

        let signature_bytes = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| CredentialError::InvalidToken("signature is not base64url".into()))?;
        let signature = Signature::from_slice(&signature_bytes)?;
        let signing_input = format!("{header_b64}.{payload_b64}");
        self.verifying_key
            .verify(signing_input.as_bytes(), &signature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| CredentialError::InvalidToken("payload is not base64url".into()))?;
        let claims: TokenClaims = serde_json::from_slice(&payload)
            .map_err(|e| CredentialError::InvalidToken(e.to_string()))?;

        if claims.is_expired() {
            return Err(CredentialError::TokenExpired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer(ttl: Duration) -> Ed25519TokenIssuer {
        Ed25519TokenIssuer::new(SigningKey::generate(), ttl)
    }

    #[test]
    fn issue_and_verify() {
        let issuer = issuer(Duration::hours(1));
        let id = ClientId::new();
        let token = issuer.issue(&SubjectClaims::new(id, "a@x.com")).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_rejected() {
        let issuer = issuer(Duration::seconds(-10));
        let token = issuer
            .issue(&SubjectClaims::new(ClientId::new(), "a@x.com"))
            .unwrap();
        assert_eq!(issuer.verify(&token), Err(CredentialError::TokenExpired));
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let issuer = issuer(Duration::milliseconds(i64::MAX));
        let err = issuer
            .issue(&SubjectClaims::new(ClientId::new(), "a@x.com"))
            .unwrap_err();
        assert!(matches!(err, CredentialError::TokenEncoding(_)));
    }

    #[test]
    fn token_from_other_key_rejected() {
        let token = issuer(Duration::hours(1))
            .issue(&SubjectClaims::new(ClientId::new(), "a@x.com"))
            .unwrap();
        let err = issuer(Duration::hours(1)).verify(&token).unwrap_err();
        assert_eq!(err, CredentialError::InvalidSignature);
    }

    #[test]
    fn tampered_payload_rejected() {
        let issuer = issuer(Duration::hours(1));
        let token = issuer
            .issue(&SubjectClaims::new(ClientId::new(), "a@x.com"))
            .unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&TokenClaims {
                sub: ClientId::new(),
                username: "admin@x.com".into(),
                iat: 0,
                exp: i64::MAX,
            })
            .unwrap(),
        );
        let tampered = format!("{}.{}.{}", parts[0], forged, parts[2]);
        assert!(issuer.verify(&tampered).is_err());
    }

    #[test]
    fn malformed_token_rejected() {
        let issuer = issuer(Duration::hours(1));
        assert!(matches!(
            issuer.verify("only.two"),
            Err(CredentialError::InvalidToken(_))
        ));
        assert!(issuer.verify("a.b.!!!").is_err());
    }
}
