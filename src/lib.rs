//! # securevault-core
//!
//! Cryptographic and token-lifecycle core for an encrypted secrets vault.
//!
//! User secrets are encrypted at rest under per-user keys derived from a
//! single master key; users authenticate with Argon2id-hashed passwords and
//! hold short-lived signed tokens. HTTP routing, persistence, and UI live
//! elsewhere and talk to this crate through plain typed functions and the
//! `UserStore`/`SecretStore` traits — no framework types cross the boundary.
//!
//! ## Public API
//!
//! The public surface of this crate is intentionally narrow. Only the types
//! and functions listed here are intended for use by callers. Raw key bytes
//! are `pub(crate)` at most and never leave the crate.

// Module declarations.
pub mod config;
pub(crate) mod crypto;
pub mod error;
pub mod keys;
pub mod password;
pub mod session;
pub mod token;
pub mod vault;

pub use config::CoreConfig;
pub use crypto::{EncryptedSecret, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use error::VaultError;
pub use keys::{derive_user_key, DerivedKey, MasterKey};
pub use password::PasswordHasher;
pub use session::{AuthSessionManager, UserRecord, UserStore};
pub use token::{Claims, SigningSecret, TokenPair, TokenService, TokenType};
pub use vault::{SecretStore, SecretVault};

/// Encrypt a plaintext under a derived key. See [`vault::SecretVault`] for
/// the store-backed flow.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Result<EncryptedSecret, VaultError> {
    crypto::encrypt(key, plaintext)
}

/// Decrypt an [`EncryptedSecret`] under a derived key. Fails with
/// [`VaultError::AuthenticationFailure`] on any tampering or key mismatch.
pub fn decrypt(key: &DerivedKey, secret: &EncryptedSecret) -> Result<Vec<u8>, VaultError> {
    crypto::decrypt(key, secret)
}

/// Generate a cryptographically secure master key.
///
/// This is the only entry point for producing master key material locally.
/// In production, callers should source master keys from a KMS or the
/// environment via [`CoreConfig`] rather than generating them in-process.
pub fn generate_master_key() -> Result<MasterKey, VaultError> {
    let bytes = crypto::generate_random_key()?;
    Ok(MasterKey::from_bytes(bytes))
}

/// Generate a cryptographically secure token-signing secret.
///
/// Distinct from the master key: the two secrets have no derivation
/// relationship, so a leak of one does not compromise the other.
pub fn generate_signing_secret() -> Result<SigningSecret, VaultError> {
    let bytes = crypto::generate_random_key()?;
    Ok(SigningSecret::from_bytes(bytes.to_vec()))
}
