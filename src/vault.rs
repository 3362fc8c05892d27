//! Per-secret encryption orchestration.
//!
//! `SecretVault` is the seam between the crypto primitives and the
//! persistence collaborator: every stored secret is encrypted under the
//! owner's derived key before it reaches the store, and authenticated on
//! the way back out. Plaintext exists only inside these function bodies.
//!
//! The store owns the ownership check. The vault trusts the owner id it is
//! given — by the time a request reaches this layer, the routing
//! collaborator has already authenticated the caller.

use crate::crypto::{self, EncryptedSecret};
use crate::error::VaultError;
use crate::keys::{derive_user_key, MasterKey};

/// Encrypted-secret storage, implemented by the persistence collaborator.
///
/// `get` must return `SecretNotFound` for both a missing row and a row
/// owned by someone else — the two cases are indistinguishable to callers.
pub trait SecretStore {
    fn get(&self, secret_id: &str, owner_id: &str) -> Result<EncryptedSecret, VaultError>;
    fn put(
        &mut self,
        secret_id: &str,
        owner_id: &str,
        secret: EncryptedSecret,
    ) -> Result<(), VaultError>;
    fn remove(&mut self, secret_id: &str, owner_id: &str) -> Result<(), VaultError>;
}

/// Encrypts, decrypts, and deletes user secrets against a `SecretStore`.
pub struct SecretVault<'a> {
    master: &'a MasterKey,
}

impl<'a> SecretVault<'a> {
    pub fn new(master: &'a MasterKey) -> Self {
        Self { master }
    }

    /// Encrypt a plaintext under the owner's derived key and hand it to
    /// the store.
    pub fn store_secret(
        &self,
        store: &mut dyn SecretStore,
        owner_id: &str,
        secret_id: &str,
        plaintext: &[u8],
    ) -> Result<(), VaultError> {
        let key = derive_user_key(self.master, owner_id)?;
        let sealed = crypto::encrypt(&key, plaintext)?;
        store.put(secret_id, owner_id, sealed)
    }

    /// Fetch a secret from the store and decrypt it under the owner's key.
    ///
    /// A ciphertext that fails authentication (tampered at rest, or keyed
    /// to a different owner) surfaces as `AuthenticationFailure`.
    pub fn open_secret(
        &self,
        store: &dyn SecretStore,
        owner_id: &str,
        secret_id: &str,
    ) -> Result<Vec<u8>, VaultError> {
        let sealed = store.get(secret_id, owner_id)?;
        let key = derive_user_key(self.master, owner_id)?;
        crypto::decrypt(&key, &sealed)
    }

    /// Re-encrypt a stored secret under a fresh nonce.
    ///
    /// Decrypts the current ciphertext, authenticating it in the process,
    /// then seals the plaintext again and replaces the stored row. Useful
    /// for periodic re-encryption; the derived key itself does not change,
    /// since it is a pure function of the master key and owner id.
    pub fn rotate_secret(
        &self,
        store: &mut dyn SecretStore,
        owner_id: &str,
        secret_id: &str,
    ) -> Result<(), VaultError> {
        let sealed = store.get(secret_id, owner_id)?;
        let key = derive_user_key(self.master, owner_id)?;
        let plaintext = crypto::decrypt(&key, &sealed)?;
        let resealed = crypto::encrypt(&key, &plaintext)?;
        store.put(secret_id, owner_id, resealed)
    }

    /// Remove a secret. The ciphertext is simply dropped by the store;
    /// there is no key material to destroy, since keys are derived on
    /// demand.
    pub fn delete_secret(
        &self,
        store: &mut dyn SecretStore,
        owner_id: &str,
        secret_id: &str,
    ) -> Result<(), VaultError> {
        store.remove(secret_id, owner_id)
    }
}
