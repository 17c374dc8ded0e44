//! Credential vault for stored login passwords.
//!
//! Tokens are `base64(nonce || AES-256-GCM ciphertext)`. The key is derived
//! with HKDF-SHA256 from a random master secret held in the OS keychain,
//! salted with a fixed application salt and bound to the OS user name. A
//! token is therefore useless on another machine or for another user.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::hkdf;
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::KeychainError;
use crate::host::keychain::{KeychainApi, services};

/// Fixed application salt mixed into every key.
pub const APP_SALT: &[u8] = b"RiotClientAutoLoginSalt";

/// Size of the keychain-held master secret.
const MASTER_SECRET_LEN: usize = 32;

/// Errors raised while encrypting.
///
/// Decryption never surfaces these; it returns an empty string instead.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Keychain access failed.
    #[error("Keychain error: {0}")]
    Keychain(#[from] KeychainError),

    /// No master secret exists for this user.
    #[error("No vault key for user {0}")]
    MissingKey(String),

    /// Stored data is not valid base64 or has the wrong shape.
    #[error("Malformed vault data: {0}")]
    Malformed(String),

    /// The cipher rejected the operation.
    #[error("Cryptographic operation failed")]
    Crypto,
}

impl From<ring::error::Unspecified> for VaultError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::Crypto
    }
}

/// Returns the name of the logged-in OS user.
pub fn current_os_user() -> String {
    std::env::var("USERNAME")
        .or_else(|_| std::env::var("USER"))
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "default".to_string())
}

/// Encrypts and decrypts login passwords for the current OS user.
pub struct CredentialVault {
    keychain: Arc<dyn KeychainApi>,
    user: String,
    rng: SystemRandom,
}

impl CredentialVault {
    /// Creates a vault for the logged-in OS user.
    pub fn new(keychain: Arc<dyn KeychainApi>) -> Self {
        Self::for_user(keychain, current_os_user())
    }

    /// Creates a vault scoped to `user`.
    pub fn for_user(keychain: Arc<dyn KeychainApi>, user: impl Into<String>) -> Self {
        Self {
            keychain,
            user: user.into(),
            rng: SystemRandom::new(),
        }
    }

    /// Encrypts `secret` into a token. An empty secret yields an empty token.
    ///
    /// The master secret is created on first use.
    pub async fn encrypt(&self, secret: &str) -> Result<String, VaultError> {
        if secret.is_empty() {
            return Ok(String::new());
        }

        let key = self.key(true).await?;

        let mut nonce = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce)?;

        let mut sealed = secret.as_bytes().to_vec();
        key.seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce),
            Aad::from(APP_SALT),
            &mut sealed,
        )?;

        let mut token = nonce.to_vec();
        token.extend_from_slice(&sealed);
        Ok(BASE64.encode(token))
    }

    /// Decrypts a token. Any failure yields an empty string.
    pub async fn decrypt(&self, token: &str) -> String {
        if token.trim().is_empty() {
            return String::new();
        }
        match self.try_decrypt(token).await {
            Ok(secret) => secret,
            Err(e) => {
                warn!(user = %self.user, error = %e, "Could not decrypt credential");
                String::new()
            }
        }
    }

    async fn try_decrypt(&self, token: &str) -> Result<String, VaultError> {
        let bytes = BASE64
            .decode(token.trim())
            .map_err(|e| VaultError::Malformed(e.to_string()))?;
        if bytes.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(VaultError::Malformed("token too short".to_string()));
        }

        let key = self.key(false).await?;
        let (nonce, sealed) = bytes.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce)?;
        let mut buffer = sealed.to_vec();
        let plain = key.open_in_place(nonce, Aad::from(APP_SALT), &mut buffer)?;

        String::from_utf8(plain.to_vec()).map_err(|e| VaultError::Malformed(e.to_string()))
    }

    async fn key(&self, create: bool) -> Result<LessSafeKey, VaultError> {
        let master = match self.keychain.get(services::VAULT, &self.user).await? {
            Some(encoded) => BASE64
                .decode(encoded.trim())
                .map_err(|e| VaultError::Malformed(e.to_string()))?,
            None if create => self.create_master_secret().await?,
            None => return Err(VaultError::MissingKey(self.user.clone())),
        };

        let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, APP_SALT).extract(&master);
        let info = [self.user.as_bytes()];
        let okm = prk.expand(&info, &AES_256_GCM)?;
        Ok(LessSafeKey::new(UnboundKey::from(okm)))
    }

    async fn create_master_secret(&self) -> Result<Vec<u8>, VaultError> {
        let mut master = vec![0u8; MASTER_SECRET_LEN];
        self.rng.fill(&mut master)?;
        self.keychain
            .set(services::VAULT, &self.user, &BASE64.encode(&master))
            .await?;
        debug!(user = %self.user, "Created vault master secret");
        Ok(master)
    }
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVault")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
