//! Error types for the vault core.
//!
//! Every variant is a distinct failure mode in the crypto or token engine.
//! Display strings are intentionally minimal — they signal *what* failed
//! without revealing *why* in ways that could leak cryptographic state or
//! let a caller distinguish "user not found" from "wrong password".

use std::fmt;

/// The single error type for all vault-core operations.
#[derive(Debug)]
pub enum VaultError {
    /// A cryptographic key was invalid (wrong length, malformed, etc.).
    InvalidKey,

    /// Encryption failed. The underlying `ring` operation returned an error.
    EncryptionFailure,

    /// AEAD authentication failed during decryption. This covers: wrong key,
    /// tampered ciphertext, tampered nonce, or a corrupted GCM tag. No
    /// partial plaintext is ever returned alongside this error.
    AuthenticationFailure,

    /// Key derivation (HKDF) failed.
    KeyDerivationFailure,

    /// The system's random number generator failed to produce bytes.
    RandomnessFailure,

    /// Password hashing could not be performed (bad parameters, internal
    /// Argon2 failure). Distinct from a verification mismatch, which is not
    /// an error — `verify` returns `false`.
    PasswordHashFailure,

    /// Login or password-change credential check failed. Deliberately
    /// undifferentiated: unknown email and wrong password both map here.
    InvalidCredentials,

    /// Token signing failed. Internal serialization or HMAC failure while
    /// issuing — not caused by caller input.
    TokenSigningFailure,

    /// The token's expiry timestamp is in the past.
    TokenExpired,

    /// The token's signature did not verify, or the token could not be
    /// parsed at all. Malformed and forged tokens are not distinguished.
    TokenInvalidSignature,

    /// The token is valid but its `type` claim does not match what the
    /// caller expected (e.g. a refresh token presented as an access token).
    TokenTypeMismatch,

    /// No secret exists for the given id and owner. Missing and not-owned
    /// rows are collapsed into this one variant by the storage collaborator.
    SecretNotFound,

    /// Startup configuration is missing or malformed. Fatal: the process
    /// must not begin serving requests. Never produced at request time.
    Configuration(String),

    /// The persistence collaborator reported a failure.
    Storage(String),
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey => write!(f, "invalid key"),
            Self::EncryptionFailure => write!(f, "encryption failed"),
            Self::AuthenticationFailure => write!(f, "decryption failed"),
            Self::KeyDerivationFailure => write!(f, "key derivation failed"),
            Self::RandomnessFailure => write!(f, "randomness source failed"),
            Self::PasswordHashFailure => write!(f, "password hashing failed"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::TokenSigningFailure => write!(f, "token signing failed"),
            Self::TokenExpired => write!(f, "token expired"),
            Self::TokenInvalidSignature => write!(f, "token signature invalid"),
            Self::TokenTypeMismatch => write!(f, "token type mismatch"),
            Self::SecretNotFound => write!(f, "secret not found"),
            Self::Configuration(reason) => write!(f, "configuration error: {}", reason),
            Self::Storage(reason) => write!(f, "storage error: {}", reason),
        }
    }
}

impl std::error::Error for VaultError {}
