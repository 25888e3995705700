//! RSA-PSS signing
//!
//! Kalshi signature algorithm:
//! 1. SHA256(canonical message)
//! 2. RSA-PSS over the digest, MGF1(SHA256), salt length 32
//! 3. Base64 encode the signature (standard alphabet, padded)
//!
//! PSS is probabilistic, so signing the same message twice yields two
//! different signatures that both verify.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};

/// Produces signatures over canonical request messages
///
/// Implement this to plug in a different key store (HSM, remote signer).
pub trait Signer: Send + Sync {
    /// Sign the message, returning raw signature bytes
    fn sign(&self, message: &[u8]) -> AuthResult<Vec<u8>>;

    /// Sign the message and base64 encode the result
    fn sign_base64(&self, message: &[u8]) -> AuthResult<String> {
        self.sign(message).map(|sig| BASE64.encode(sig))
    }
}

/// In-process RSA-PSS/SHA-256 signer
#[derive(Clone)]
pub struct RsaPssSigner {
    key: RsaPrivateKey,
}

impl RsaPssSigner {
    pub fn new(key: RsaPrivateKey) -> Self {
        Self { key }
    }

    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::new(credentials.private_key().clone())
    }

    /// Public half of the signing key
    pub fn public_key(&self) -> RsaPublicKey {
        self.key.to_public_key()
    }
}

impl Signer for RsaPssSigner {
    fn sign(&self, message: &[u8]) -> AuthResult<Vec<u8>> {
        let digest = Sha256::digest(message);
        self.key
            .sign_with_rng(&mut rand::thread_rng(), Pss::new::<Sha256>(), &digest)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for RsaPssSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPssSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Check a base64 RSA-PSS/SHA-256 signature against a public key
pub fn verify_signature(public_key: &RsaPublicKey, message: &[u8], signature_b64: &str) -> AuthResult<()> {
    let signature = BASE64
        .decode(signature_b64)
        .map_err(|e| AuthError::Signing(format!("signature is not base64: {e}")))?;
    let digest = Sha256::digest(message);
    public_key
        .verify(Pss::new::<Sha256>(), &digest, &signature)
        .map_err(|e| AuthError::Signing(format!("verification failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKCS8: &str = include_str!("../tests/fixtures/test_key_pkcs8.pem");

    fn signer() -> RsaPssSigner {
        RsaPssSigner::from_credentials(&Credentials::from_pem_str("key-1", PKCS8).unwrap())
    }

    #[test]
    fn test_signatures_differ_but_both_verify() {
        let signer = signer();
        let message = b"1703123456789GET/trade-api/v2/portfolio/balance";

        let first = signer.sign_base64(message).unwrap();
        let second = signer.sign_base64(message).unwrap();
        assert_ne!(first, second);

        let public = signer.public_key();
        assert!(verify_signature(&public, message, &first).is_ok());
        assert!(verify_signature(&public, message, &second).is_ok());
    }

    #[test]
    fn test_tampered_message_fails() {
        let signer = signer();
        let sig = signer.sign_base64(b"1GET/a").unwrap();
        assert!(verify_signature(&signer.public_key(), b"1GET/b", &sig).is_err());
        assert!(verify_signature(&signer.public_key(), b"1GET/a", "%%%").is_err());
    }

    #[test]
    fn test_debug_redacts() {
        assert!(format!("{:?}", signer()).contains("REDACTED"));
    }
}
