//! Startup configuration for the crypto core.
//!
//! The master key and the token-signing secret are loaded exactly once,
//! validated, and passed by reference into each component. There is no
//! module-scope secret state: nothing in the crate reads the environment
//! after startup, and tests construct distinct configs per test case
//! without cross-test leakage.
//!
//! A validation failure here is `Configuration(..)` — the only error class
//! that should terminate the process. It is never produced at request time.

use crate::crypto::KEY_LEN;
use crate::error::VaultError;
use crate::keys::{self, MasterKey};
use crate::token::SigningSecret;

/// Environment variable holding the master encryption key material.
pub const MASTER_KEY_ENV: &str = "ENCRYPTION_MASTER_KEY";
/// Environment variable holding the JWT signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET_KEY";

/// Minimum length for either secret, in characters.
const MIN_SECRET_LEN: usize = 32;

/// HKDF info label used when stretching a passphrase-style master key into
/// 32 raw bytes.
const MASTER_KEY_STRETCH_INFO: &str = "master-key-derivation";

/// Immutable process-wide secrets, constructed once at startup.
///
/// Holds the master encryption key and the token-signing secret — two
/// independent secrets with no derivation relationship between them, so a
/// leak of one does not compromise the other.
pub struct CoreConfig {
    master_key: MasterKey,
    signing_secret: SigningSecret,
}

impl CoreConfig {
    /// Build a config from explicit secret material.
    ///
    /// Both inputs must be at least 32 characters. Master key material that
    /// is exactly 64 hex characters is decoded to its raw 32 bytes;
    /// anything else is treated as a passphrase and stretched through
    /// HKDF-SHA256. In production the master key should come from a KMS.
    pub fn new(master_key_material: &str, jwt_secret: &str) -> Result<Self, VaultError> {
        if master_key_material.len() < MIN_SECRET_LEN {
            return Err(VaultError::Configuration(format!(
                "{} must be at least {} characters",
                MASTER_KEY_ENV, MIN_SECRET_LEN
            )));
        }
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(VaultError::Configuration(format!(
                "{} must be at least {} characters",
                JWT_SECRET_ENV, MIN_SECRET_LEN
            )));
        }

        let master_key = Self::master_key_from_material(master_key_material)?;
        let signing_secret = SigningSecret::from_bytes(jwt_secret.as_bytes().to_vec());

        Ok(Self {
            master_key,
            signing_secret,
        })
    }

    /// Build a config from the process environment.
    ///
    /// Reads `ENCRYPTION_MASTER_KEY` and `JWT_SECRET_KEY`. A missing
    /// variable is a `Configuration` error — callers are expected to treat
    /// it as fatal and refuse to start.
    pub fn from_env() -> Result<Self, VaultError> {
        let master = std::env::var(MASTER_KEY_ENV)
            .map_err(|_| VaultError::Configuration(format!("{} is not set", MASTER_KEY_ENV)))?;
        let jwt = std::env::var(JWT_SECRET_ENV)
            .map_err(|_| VaultError::Configuration(format!("{} is not set", JWT_SECRET_ENV)))?;
        Self::new(&master, &jwt)
    }

    /// Build a config directly from a raw 32-byte master key and signing
    /// secret bytes. Used by tests that need fixed key material.
    pub fn from_raw_parts(
        master_key: [u8; KEY_LEN],
        signing_secret: Vec<u8>,
    ) -> Result<Self, VaultError> {
        if signing_secret.len() < MIN_SECRET_LEN {
            return Err(VaultError::Configuration(format!(
                "signing secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self {
            master_key: MasterKey::from_bytes(master_key),
            signing_secret: SigningSecret::from_bytes(signing_secret),
        })
    }

    fn master_key_from_material(material: &str) -> Result<MasterKey, VaultError> {
        // A 64-hex-char value is taken as the raw key itself.
        if material.len() == KEY_LEN * 2 {
            if let Ok(decoded) = hex::decode(material) {
                let bytes: [u8; KEY_LEN] = decoded
                    .try_into()
                    .map_err(|_| VaultError::Configuration("bad master key length".into()))?;
                return Ok(MasterKey::from_bytes(bytes));
            }
        }
        // Otherwise: a passphrase. Stretch it into a proper 256-bit key.
        let stretched = keys::stretch_key_material(material.as_bytes(), MASTER_KEY_STRETCH_INFO)?;
        Ok(MasterKey::from_bytes(stretched))
    }

    /// The master encryption key. Borrowed by per-secret operations for
    /// user-key derivation.
    pub fn master_key(&self) -> &MasterKey {
        &self.master_key
    }

    /// The token-signing secret. Borrowed by `TokenService`.
    pub fn signing_secret(&self) -> &SigningSecret {
        &self.signing_secret
    }
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CoreConfig(..)")
    }
}
