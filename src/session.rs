//! Login, refresh, and password-change orchestration.
//!
//! `AuthSessionManager` wires the password hasher and token service
//! together over a narrow repository trait. It holds no per-session state:
//! the session is whatever token the caller presents. Authorization policy
//! (row ownership) and HTTP concerns stay with the collaborators.
//!
//! Failure discipline: unknown email and wrong password both surface as
//! `InvalidCredentials`, with nothing in the error or the logs that lets a
//! caller tell the two apart.

use log::{info, warn};

use crate::error::VaultError;
use crate::password::PasswordHasher;
use crate::token::{TokenPair, TokenService, TokenType};

/// The repository-visible shape of a user row.
///
/// The persistence collaborator owns storage; the core only ever sees this
/// struct. `password_hash` is the PHC record string, never a plaintext
/// password.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    /// Deactivated accounts fail login and refresh like bad credentials.
    pub is_active: bool,
}

/// Credential/user lookup and mutation, implemented by the persistence
/// collaborator. All methods are synchronous from the core's point of view.
pub trait UserStore {
    fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, VaultError>;
    fn find_user_by_id(&self, id: &str) -> Result<Option<UserRecord>, VaultError>;
    /// Insert a new user row. Must fail if the email is already taken —
    /// the manager maps that to the same undifferentiated failure as any
    /// other registration problem.
    fn insert_user(&mut self, user: UserRecord) -> Result<(), VaultError>;
    fn update_password_hash(&mut self, user_id: &str, password_hash: &str)
        -> Result<(), VaultError>;
}

/// Fixed input for the decoy verification below. The value is irrelevant —
/// no caller-supplied password is expected to match it.
const DUMMY_PASSWORD: &str = "securevault-dummy-credential";

/// Orchestrates authentication flows over `{Anonymous, Authenticated}`.
///
/// The state machine is per presented credential, not server-side: login
/// moves a caller to Authenticated by handing them tokens, expiry moves
/// them back.
pub struct AuthSessionManager<'a> {
    hasher: &'a PasswordHasher,
    tokens: &'a TokenService,
    /// A record for a password nobody holds, hashed once at construction.
    /// Verified against on the unknown-email login path so that path costs
    /// one Argon2 verification, the same as a wrong password for a known
    /// email — timing cannot separate the two.
    dummy_record: String,
}

impl<'a> AuthSessionManager<'a> {
    pub fn new(hasher: &'a PasswordHasher, tokens: &'a TokenService) -> Result<Self, VaultError> {
        let dummy_record = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            hasher,
            tokens,
            dummy_record,
        })
    }

    /// Register a new user.
    ///
    /// Hashes the password and inserts the row. A duplicate email is
    /// reported as `InvalidCredentials` — the same generic denial as every
    /// other credential failure, so registration cannot be used to
    /// enumerate accounts.
    pub fn register(
        &self,
        store: &mut dyn UserStore,
        user_id: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, VaultError> {
        if store.find_user_by_email(email)?.is_some() {
            warn!("registration attempt for existing email");
            return Err(VaultError::InvalidCredentials);
        }

        let user = UserRecord {
            id: user_id.to_string(),
            email: email.to_string(),
            password_hash: self.hasher.hash(password)?,
            is_active: true,
        };
        store.insert_user(user.clone())?;
        info!("new user registered: {}", user.id);
        Ok(user)
    }

    /// Authenticate credentials and mint a token pair.
    ///
    /// Unknown email, wrong password, and deactivated account all collapse
    /// to `InvalidCredentials`, and the unknown-email path performs a decoy
    /// verification so the collapse holds for timing as well as for the
    /// error value. On success, a stale password record (hashed
    /// under older cost parameters) is transparently re-hashed and stored
    /// before tokens are issued.
    pub fn login(
        &self,
        store: &mut dyn UserStore,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, VaultError> {
        let user = match store.find_user_by_email(email)? {
            Some(user) => user,
            None => {
                // Burn one verification against the dummy record so an
                // unknown email takes as long as a wrong password.
                let _ = self.hasher.verify(password, &self.dummy_record);
                warn!("login attempt for unknown email");
                return Err(VaultError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &user.password_hash) {
            warn!("failed login attempt for user {}", user.id);
            return Err(VaultError::InvalidCredentials);
        }

        if !user.is_active {
            warn!("login attempt for inactive user {}", user.id);
            return Err(VaultError::InvalidCredentials);
        }

        // Parameter-upgrade path: re-hash with current costs while the
        // plaintext password is available.
        if self.hasher.needs_rehash(&user.password_hash) {
            let rehashed = self.hasher.hash(password)?;
            store.update_password_hash(&user.id, &rehashed)?;
            info!("rehashed password for user {}", user.id);
        }

        let pair = self.tokens.issue_pair(&user.id)?;
        info!("successful login for user {}", user.id);
        Ok(pair)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The token must verify as type `refresh`, and the subject must still
    /// exist and be active. The presented refresh token is *not*
    /// invalidated — there is no server-side revocation in this design, so
    /// it stays usable until its natural expiry.
    pub fn refresh(
        &self,
        store: &dyn UserStore,
        refresh_token: &str,
    ) -> Result<String, VaultError> {
        let claims = self.tokens.verify(refresh_token, TokenType::Refresh)?;

        match store.find_user_by_id(&claims.sub)? {
            Some(user) if user.is_active => self.tokens.issue_access_token(&user.id),
            _ => {
                warn!("refresh attempt for missing or inactive subject");
                Err(VaultError::InvalidCredentials)
            }
        }
    }

    /// Logout is a client-side discard of held tokens.
    ///
    /// Tokens are stateless and there is no server-side denylist, so
    /// nothing can be revoked here — a known design gap, kept visible
    /// rather than papered over. This method exists so the flow has an
    /// explicit place in the API surface.
    pub fn logout(&self) {
        info!("logout: client should discard tokens; none revoked server-side");
    }

    /// Change a user's password.
    ///
    /// Verifies the current password first (failure is
    /// `InvalidCredentials`), requires the new password to differ, then
    /// stores a fresh record. Previously issued tokens are not revoked.
    pub fn change_password(
        &self,
        store: &mut dyn UserStore,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), VaultError> {
        let user = store
            .find_user_by_id(user_id)?
            .ok_or(VaultError::InvalidCredentials)?;

        if !self.hasher.verify(current_password, &user.password_hash) {
            warn!("password change with wrong current password for user {}", user.id);
            return Err(VaultError::InvalidCredentials);
        }

        if self.hasher.verify(new_password, &user.password_hash) {
            return Err(VaultError::InvalidCredentials);
        }

        let new_hash = self.hasher.hash(new_password)?;
        store.update_password_hash(&user.id, &new_hash)?;
        info!("password changed for user {}", user.id);
        Ok(())
    }
}
