//! Signed, typed, expiring tokens.
//!
//! Tokens are compact JWTs (HS256) carrying the claim set
//! `{sub, iat, exp, type, jti?}`. The `type` claim is what prevents a
//! refresh token from being accepted where an access token is required —
//! `verify` checks signature, expiry, and type before returning any claim
//! to the caller.
//!
//! Tokens are stateless: nothing is persisted server-side, and there is no
//! revocation list. A refresh token stays usable until its natural expiry.
//! That gap is deliberate and documented in `AuthSessionManager::logout`.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::crypto;
use crate::error::VaultError;

/// Access token lifetime: 15 minutes.
const ACCESS_TOKEN_LIFETIME_MINUTES: i64 = 15;
/// Refresh token lifetime: 7 days.
const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 7;
/// Length of the random refresh-token id in bytes (hex-encoded in `jti`).
const TOKEN_ID_LEN: usize = 16;

/// The two token purposes. Serialized as `"access"` / `"refresh"` in the
/// `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// The claim set inside a signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id the token was issued to.
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Token purpose. Checked against the caller's expectation on verify.
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Unique token id, present on refresh tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// The HS256 signing secret. Distinct from the master encryption key.
///
/// - Not `Clone`. Zeroised on drop.
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    /// Construct a signing secret from raw bytes.
    ///
    /// `pub(crate)` — callers go through `CoreConfig`, which enforces the
    /// minimum-length policy, or through `generate_signing_secret()`.
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for SigningSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

/// A freshly issued access/refresh token pair, as returned by login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and verifies signed, typed, expiring tokens.
///
/// Stateless apart from the read-only signing secret; safe for concurrent
/// use from any number of threads.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenService {
    /// Construct a service with the production lifetimes (15 min access,
    /// 7 day refresh).
    pub fn new(secret: &SigningSecret) -> Self {
        Self::with_lifetimes(
            secret,
            Duration::minutes(ACCESS_TOKEN_LIFETIME_MINUTES),
            Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
        )
    }

    /// Construct a service with explicit lifetimes. Exists so tests can
    /// mint already-expired or short-lived tokens without sleeping.
    pub fn with_lifetimes(
        secret: &SigningSecret,
        access_lifetime: Duration,
        refresh_lifetime: Duration,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_lifetime,
            refresh_lifetime,
        }
    }

    /// Issue a short-lived access token for a user.
    pub fn issue_access_token(&self, user_id: &str) -> Result<String, VaultError> {
        self.issue(user_id, TokenType::Access, self.access_lifetime, None)
    }

    /// Issue a longer-lived refresh token for a user.
    ///
    /// Carries a unique `jti` so individual refresh tokens are
    /// distinguishable (a prerequisite for any future denylist).
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String, VaultError> {
        let mut id_bytes = [0u8; TOKEN_ID_LEN];
        crypto::fill_random(&mut id_bytes)?;
        self.issue(
            user_id,
            TokenType::Refresh,
            self.refresh_lifetime,
            Some(hex::encode(id_bytes)),
        )
    }

    /// Issue both tokens at once, as login does.
    pub fn issue_pair(&self, user_id: &str) -> Result<TokenPair, VaultError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(user_id)?,
            refresh_token: self.issue_refresh_token(user_id)?,
        })
    }

    fn issue(
        &self,
        user_id: &str,
        token_type: TokenType,
        lifetime: Duration,
        jti: Option<String>,
    ) -> Result<String, VaultError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            token_type,
            jti,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| VaultError::TokenSigningFailure)
    }

    /// Verify a token and return its claims.
    ///
    /// Signature, expiry, and type are all checked before any claim is
    /// trusted. Failure modes:
    /// - `TokenExpired` — `exp` is in the past (no leeway)
    /// - `TokenInvalidSignature` — signature check failed, or the token is
    ///   malformed / signed with a different algorithm
    /// - `TokenTypeMismatch` — valid token, wrong `type` claim
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, VaultError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => VaultError::TokenExpired,
                _ => VaultError::TokenInvalidSignature,
            })?;

        if data.claims.token_type != expected {
            return Err(VaultError::TokenTypeMismatch);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        let secret = SigningSecret::from_bytes(b"unit-test-signing-secret-32bytes".to_vec());
        TokenService::new(&secret)
    }

    #[test]
    fn access_token_roundtrip() {
        let svc = service();
        let token = svc.issue_access_token("user-42").unwrap();
        let claims = svc.verify(&token, TokenType::Access).unwrap();
        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(claims.jti.is_none());
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn refresh_token_carries_unique_jti() {
        let svc = service();
        let a = svc.issue_refresh_token("user-42").unwrap();
        let b = svc.issue_refresh_token("user-42").unwrap();
        let claims_a = svc.verify(&a, TokenType::Refresh).unwrap();
        let claims_b = svc.verify(&b, TokenType::Refresh).unwrap();
        assert_ne!(claims_a.jti.unwrap(), claims_b.jti.unwrap());
    }

    #[test]
    fn type_confusion_is_rejected() {
        let svc = service();
        let access = svc.issue_access_token("user-42").unwrap();
        let refresh = svc.issue_refresh_token("user-42").unwrap();

        assert!(matches!(
            svc.verify(&access, TokenType::Refresh),
            Err(VaultError::TokenTypeMismatch)
        ));
        assert!(matches!(
            svc.verify(&refresh, TokenType::Access),
            Err(VaultError::TokenTypeMismatch)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = SigningSecret::from_bytes(b"unit-test-signing-secret-32bytes".to_vec());
        let svc = TokenService::with_lifetimes(
            &secret,
            Duration::seconds(-30),
            Duration::seconds(-30),
        );
        let token = svc.issue_access_token("user-42").unwrap();
        assert!(matches!(
            svc.verify(&token, TokenType::Access),
            Err(VaultError::TokenExpired)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let svc = service();
        let other_secret = SigningSecret::from_bytes(b"a-completely-different-hs256-key".to_vec());
        let other = TokenService::new(&other_secret);

        let token = svc.issue_access_token("user-42").unwrap();
        assert!(matches!(
            other.verify(&token, TokenType::Access),
            Err(VaultError::TokenInvalidSignature)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let svc = service();
        assert!(matches!(
            svc.verify("not.a.jwt", TokenType::Access),
            Err(VaultError::TokenInvalidSignature)
        ));
        assert!(matches!(
            svc.verify("", TokenType::Access),
            Err(VaultError::TokenInvalidSignature)
        ));
    }

    #[test]
    fn type_claim_serializes_lowercase() {
        use base64::Engine as _;

        let svc = service();
        let token = svc.issue_refresh_token("user-42").unwrap();
        // Decode the payload segment without verifying — inspecting the
        // wire format only.
        let payload = token.split('.').nth(1).unwrap();
        let json = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(payload)
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(payload["type"], "refresh");
        assert!(payload["jti"].is_string());
    }
}
