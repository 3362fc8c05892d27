//! Key derivation and ownership.
//!
//! This module owns two responsibilities:
//! 1. Deriving per-user encryption keys from the master key using HKDF-SHA256.
//! 2. Holding key material in types that are opaque, non-cloneable, and
//!    zeroised on drop.
//!
//! This is one of exactly two modules permitted to import `ring` directly
//! (the other is `crypto`). The HKDF derivation logic lives here because
//! it operates on the key material itself — not on ciphertexts.
//!
//! ## Derivation structure
//!
//! ```text
//! HKDF-SHA256(
//!     ikm  = master_key,
//!     salt = None,
//!     info = "user-key:{user_id}"
//! )
//! ```
//!
//! Each user id produces a statistically independent key. Knowing one
//! derived key reveals nothing about the master key or any other user's
//! key, so compromising one user's data does not affect the rest.

use ring::hkdf;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::KEY_LEN;
use crate::error::VaultError;

/// Info prefix binding every derived key to the per-user-key purpose.
const USER_KEY_INFO_PREFIX: &str = "user-key:";

// ---------------------------------------------------------------------------
// Master key
// ---------------------------------------------------------------------------

/// The master key. This is the single secret from which every per-user
/// encryption key is derived. Loaded once at process start, held only in
/// memory, never persisted or logged.
///
/// - Not `Clone`. Cannot be duplicated without explicit conversion.
/// - Zeroised on drop. Memory is overwritten before deallocation.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Construct a `MasterKey` from raw bytes.
    ///
    /// In production the bytes should come from `CoreConfig`, which sources
    /// them from the environment (or, ideally, a KMS). Tests may construct
    /// fixed keys directly.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Borrow the raw key bytes for use in HKDF derivation.
    ///
    /// This method is `pub(crate)` — raw bytes never leave the crate.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material must never appear in logs or panic messages.
        f.write_str("MasterKey(..)")
    }
}

// ---------------------------------------------------------------------------
// Derived key
// ---------------------------------------------------------------------------

/// A key derived for a single user.
///
/// - Not `Clone`. Each derived key is scoped to one user and recomputed on
///   demand — derivation is deterministic, so nothing is lost by dropping it.
/// - Zeroised on drop.
/// - Raw bytes are never exposed outside this crate. The `crypto` module
///   accesses them through `as_bytes()`, which is `pub(crate)`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Borrow the raw key bytes for use in encrypt/decrypt operations.
    ///
    /// `pub(crate)` — raw bytes never leave the crate.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Derive the encryption key for a specific user.
///
/// The `info` string is constructed as `user-key:{user_id}`, so the same
/// user always yields the same key under a fixed master key, and no two
/// users ever share a key.
///
/// # Security properties
/// - HKDF is one-way: the derived key reveals nothing about the master key.
/// - Different info strings produce statistically independent outputs.
/// - The output length is fixed at 256 bits (32 bytes).
pub fn derive_user_key(master: &MasterKey, user_id: &str) -> Result<DerivedKey, VaultError> {
    let info = format!("{}{}", USER_KEY_INFO_PREFIX, user_id);

    // Extract phase: derive a pseudorandom key (PRK) from the master key.
    // An empty salt is provided — HKDF internally treats this as a
    // zero-filled salt of the hash output length, which is standard.
    let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, &[]);
    let prk = salt.extract(master.as_bytes());

    // Expand phase: derive the final key from the PRK and the info string.
    let info_bytes = info.as_bytes();
    let info_slices = [info_bytes];
    let okm = prk
        .expand(&info_slices, hkdf::HKDF_SHA256)
        .map_err(|_| VaultError::KeyDerivationFailure)?;

    let mut derived = [0u8; KEY_LEN];
    okm.fill(&mut derived)
        .map_err(|_| VaultError::KeyDerivationFailure)?;

    Ok(DerivedKey { bytes: derived })
}

/// Stretch arbitrary key material into a 256-bit key.
///
/// Used by `CoreConfig` when the configured master key is a passphrase
/// rather than 32 raw bytes. The `info` string provides domain separation
/// from per-user derivation.
pub(crate) fn stretch_key_material(ikm: &[u8], info: &str) -> Result<[u8; KEY_LEN], VaultError> {
    let salt = hkdf::Salt::new(hkdf::HKDF_SHA256, &[]);
    let prk = salt.extract(ikm);

    let info_bytes = info.as_bytes();
    let info_slices = [info_bytes];
    let okm = prk
        .expand(&info_slices, hkdf::HKDF_SHA256)
        .map_err(|_| VaultError::KeyDerivationFailure)?;

    let mut out = [0u8; KEY_LEN];
    okm.fill(&mut out)
        .map_err(|_| VaultError::KeyDerivationFailure)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let master = MasterKey::from_bytes([7u8; KEY_LEN]);
        let a = derive_user_key(&master, "user-1").unwrap();
        let b = derive_user_key(&master, "user-1").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_users_get_different_keys() {
        let master = MasterKey::from_bytes([7u8; KEY_LEN]);
        let a = derive_user_key(&master, "user-1").unwrap();
        let b = derive_user_key(&master, "user-2").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_masters_get_different_keys() {
        let m1 = MasterKey::from_bytes([1u8; KEY_LEN]);
        let m2 = MasterKey::from_bytes([2u8; KEY_LEN]);
        let a = derive_user_key(&m1, "user-1").unwrap();
        let b = derive_user_key(&m2, "user-1").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn debug_never_prints_key_bytes() {
        let master = MasterKey::from_bytes([0xAB; KEY_LEN]);
        let rendered = format!("{:?}", master);
        assert_eq!(rendered, "MasterKey(..)");
        assert!(!rendered.contains("171")); // 0xAB
    }
}
