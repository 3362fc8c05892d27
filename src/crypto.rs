//! Low-level cryptographic operations.
//!
//! This module is one of exactly two places in the crate that import `ring`
//! directly (the other is `keys`). All other modules perform encryption and
//! decryption exclusively through the functions exposed here.
//!
//! Primitive choices:
//! - **Cipher**: AES-256-GCM (authenticated encryption)
//! - **Nonce**: 96-bit (12 bytes), generated fresh per operation via `SystemRandom`
//! - **Key size**: 256 bits (32 bytes)
//!
//! ## Nonce budget
//!
//! Nonces are random, not counter-based. Random 96-bit nonces carry a
//! birthday-bound collision risk that becomes material around 2³²
//! encryptions under a single key. Keys here are per-user, so a single user
//! would need billions of stored secrets before that bound matters. Callers
//! operating anywhere near that volume must switch to a counter-based
//! nonce scheme.

use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::keys::DerivedKey;

/// The AEAD algorithm used throughout the vault core.
const ALGORITHM: &aead::Algorithm = &AES_256_GCM;

/// Size of the nonce in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Size of a master or derived key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// An encrypted secret payload, as handed to the persistence collaborator.
///
/// The nonce and ciphertext are separate fields — the storage layer owns
/// their column layout. `ciphertext` always ends with the 16-byte GCM tag,
/// so its length is `plaintext.len() + TAG_LEN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    /// Fresh random nonce used for this one encryption.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext with the GCM authentication tag appended.
    pub ciphertext: Vec<u8>,
}

/// Generate a cryptographically secure random nonce.
///
/// Uses `ring::rand::SystemRandom` — the only source of randomness in the
/// crate. A fresh nonce is generated for every encryption call. There is no
/// nonce caching or counter-based generation.
fn generate_nonce() -> Result<[u8; NONCE_LEN], VaultError> {
    let rng = SystemRandom::new();
    let mut buf = [0u8; NONCE_LEN];
    rng.fill(&mut buf).map_err(|_| VaultError::RandomnessFailure)?;
    Ok(buf)
}

/// Encrypt a plaintext payload using AES-256-GCM.
///
/// Returns the nonce alongside the ciphertext-with-tag. The caller (in
/// practice the persistence collaborator, via `SecretVault`) stores both and
/// presents them back for decryption.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Result<EncryptedSecret, VaultError> {
    let unbound = UnboundKey::new(ALGORITHM, key.as_bytes())
        .map_err(|_| VaultError::InvalidKey)?;
    let sealing_key = LessSafeKey::new(unbound);

    let nonce_bytes = generate_nonce()?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut buf = Vec::with_capacity(plaintext.len() + ALGORITHM.tag_len());
    buf.extend_from_slice(plaintext);

    // `seal_in_place_append_tag` encrypts `buf` in place and appends the
    // GCM authentication tag.
    sealing_key
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut buf)
        .map_err(|_| VaultError::EncryptionFailure)?;

    Ok(EncryptedSecret {
        nonce: nonce_bytes,
        ciphertext: buf,
    })
}

/// Decrypt an encrypted secret using AES-256-GCM.
///
/// If the key is wrong, or the nonce or ciphertext has been tampered with,
/// the GCM authentication check fails and this function returns
/// `AuthenticationFailure`. The caller receives no partial plaintext.
pub fn decrypt(key: &DerivedKey, secret: &EncryptedSecret) -> Result<Vec<u8>, VaultError> {
    if secret.ciphertext.len() < TAG_LEN {
        return Err(VaultError::AuthenticationFailure);
    }

    let unbound = UnboundKey::new(ALGORITHM, key.as_bytes())
        .map_err(|_| VaultError::InvalidKey)?;
    let opening_key = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(secret.nonce);
    let mut buf = secret.ciphertext.clone();

    let plaintext = opening_key
        .open_in_place(nonce, Aad::empty(), &mut buf)
        .map_err(|_| VaultError::AuthenticationFailure)?;

    Ok(plaintext.to_vec())
}

/// Generate a cryptographically secure random 256-bit key.
///
/// This is the only function in the crate that produces raw key material
/// from scratch. It backs `generate_master_key()` in the public API.
pub fn generate_random_key() -> Result<[u8; KEY_LEN], VaultError> {
    let rng = SystemRandom::new();
    let mut key = [0u8; KEY_LEN];
    rng.fill(&mut key).map_err(|_| VaultError::RandomnessFailure)?;
    Ok(key)
}

/// Fill an arbitrary buffer with cryptographically secure random bytes.
///
/// `pub(crate)` — used by the token service for refresh-token ids.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<(), VaultError> {
    let rng = SystemRandom::new();
    rng.fill(buf).map_err(|_| VaultError::RandomnessFailure)
}
