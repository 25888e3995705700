//! API credentials for Kalshi
//!
//! A credential is the API key id plus the RSA private key registered for it.
//!
//! # Security
//!
//! - PEM text read from disk is held in a [`SecretString`] until parsed
//! - `RsaPrivateKey` zeroizes its limbs on drop
//! - The `Debug` impl never prints key material

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Environment variable holding the API key id
pub const KEY_ID_ENV: &str = "KALSHI_API_KEY_ID";
/// Environment variable holding the path of the PEM private key
pub const PRIVATE_KEY_PATH_ENV: &str = "KALSHI_PRIVATE_KEY_PATH";

/// API credentials for authenticated requests
#[derive(Clone)]
pub struct Credentials {
    key_id: String,
    private_key: RsaPrivateKey,
}

impl Credentials {
    /// Create credentials from an already parsed key
    pub fn new(key_id: impl Into<String>, private_key: RsaPrivateKey) -> Self {
        Self {
            key_id: key_id.into(),
            private_key,
        }
    }

    /// Parse a PEM private key (PKCS#8 `BEGIN PRIVATE KEY` or PKCS#1 `BEGIN RSA PRIVATE KEY`)
    pub fn from_pem_str(key_id: impl Into<String>, pem: &str) -> AuthResult<Self> {
        let key_id = key_id.into();
        if key_id.is_empty() {
            return Err(AuthError::InvalidKey("key id is empty".to_string()));
        }

        let private_key = parse_private_key(pem)?;
        Ok(Self::new(key_id, private_key))
    }

    /// Read and parse a PEM private key file
    pub fn from_pem_file(key_id: impl Into<String>, path: impl AsRef<Path>) -> AuthResult<Self> {
        let path = path.as_ref();
        let pem: SecretString = std::fs::read_to_string(path)
            .map_err(|e| AuthError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
            .into();

        debug!(path = %path.display(), "Loaded private key file");
        Self::from_pem_str(key_id, pem.expose_secret())
    }

    /// Load credentials from environment variables
    ///
    /// Reads `KALSHI_API_KEY_ID` and the PEM file named by `KALSHI_PRIVATE_KEY_PATH`.
    pub fn from_env() -> AuthResult<Self> {
        let key_id = std::env::var(KEY_ID_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(KEY_ID_ENV.to_string()))?;
        let path = std::env::var(PRIVATE_KEY_PATH_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(PRIVATE_KEY_PATH_ENV.to_string()))?;

        Self::from_pem_file(key_id, path)
    }

    /// Get the API key id
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub(crate) fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown: String = self.key_id.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("key_id", &format!("{shown}..."))
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

fn parse_private_key(pem: &str) -> AuthResult<RsaPrivateKey> {
    let pem = pem.trim();
    if pem.contains("BEGIN PRIVATE KEY") {
        RsaPrivateKey::from_pkcs8_pem(pem).map_err(|e| AuthError::InvalidKey(format!("PKCS#8: {e}")))
    } else if pem.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(pem).map_err(|e| AuthError::InvalidKey(format!("PKCS#1: {e}")))
    } else {
        Err(AuthError::InvalidKey(
            "expected a PEM block with BEGIN PRIVATE KEY or BEGIN RSA PRIVATE KEY".to_string(),
        ))
    }
}
