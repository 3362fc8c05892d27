//! Password hashing with Argon2id.
//!
//! Hashes are encoded as PHC strings
//! (`$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`), so the algorithm, cost
//! parameters, and salt travel with the stored record. Verification reads
//! the parameters out of the record, which keeps old records verifiable
//! after the defaults are raised.
//!
//! Parameter choices (Argon2id, the PHC winner):
//! - memory: 64 MiB
//! - iterations: 3
//! - parallelism: 4
//! - salt: 16 random bytes
//! - output: 32 bytes
//!
//! Verification uses the argon2 crate's constant-time comparison. A
//! mismatch is a `false` return, not an error — only an internal hashing
//! failure surfaces as `PasswordHashFailure`.

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version};

use crate::crypto;
use crate::error::VaultError;

/// Memory cost in KiB (64 MiB).
const MEMORY_COST_KIB: u32 = 65_536;
/// Number of iterations.
const TIME_COST: u32 = 3;
/// Degree of parallelism.
const PARALLELISM: u32 = 4;
/// Length of the random salt in bytes.
const SALT_LEN: usize = 16;
/// Length of the hash output in bytes.
const OUTPUT_LEN: usize = 32;

/// Hashes and verifies user passwords.
///
/// Stateless apart from its cost parameters; safe to share across threads.
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Construct a hasher with the production cost parameters.
    pub fn new() -> Result<Self, VaultError> {
        Self::with_params(MEMORY_COST_KIB, TIME_COST, PARALLELISM)
    }

    /// Construct a hasher with explicit cost parameters.
    ///
    /// Production code should use `new()`. Lighter parameters exist for
    /// tests that exercise hashing properties unrelated to cost.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, VaultError> {
        let params = Params::new(memory_kib, iterations, parallelism, Some(OUTPUT_LEN))
            .map_err(|_| VaultError::PasswordHashFailure)?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password into a self-describing PHC record string.
    ///
    /// A fresh 16-byte salt is drawn per call, so hashing the same password
    /// twice yields two different records that both verify.
    pub fn hash(&self, password: &str) -> Result<String, VaultError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        crypto::fill_random(&mut salt_bytes)?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|_| VaultError::PasswordHashFailure)?;

        let record = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| VaultError::PasswordHashFailure)?;

        Ok(record.to_string())
    }

    /// Verify a password against a stored record.
    ///
    /// The comparison is constant-time. Parameters are taken from the
    /// record itself, so records hashed under older cost settings still
    /// verify. Malformed records verify `false`.
    pub fn verify(&self, password: &str, record: &str) -> bool {
        let parsed = match PasswordHash::new(record) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Whether a stored record was produced under different parameters than
    /// this hasher currently uses.
    ///
    /// Callers re-hash on the next successful login when this returns true,
    /// so a parameter upgrade propagates through the user base over time.
    /// Malformed records report `true` — they need replacing regardless.
    pub fn needs_rehash(&self, record: &str) -> bool {
        let parsed = match PasswordHash::new(record) {
            Ok(parsed) => parsed,
            Err(_) => return true,
        };
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(stored) => {
                stored.m_cost() != self.params.m_cost()
                    || stored.t_cost() != self.params.t_cost()
                    || stored.p_cost() != self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}
