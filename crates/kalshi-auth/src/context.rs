//! Per-request signing
//!
//! The canonical message is `timestamp_ms + METHOD + path`, where the path
//! starts at the API prefix and has any query string removed.

use std::sync::Arc;

use kalshi_types::{Environment, HttpMethod};

use crate::credentials::Credentials;
use crate::error::AuthResult;
use crate::signer::{RsaPssSigner, Signer};

/// Header carrying the API key id
pub const ACCESS_KEY_HEADER: &str = "KALSHI-ACCESS-KEY";
/// Header carrying the base64 signature
pub const ACCESS_SIGNATURE_HEADER: &str = "KALSHI-ACCESS-SIGNATURE";
/// Header carrying the millisecond timestamp that was signed
pub const ACCESS_TIMESTAMP_HEADER: &str = "KALSHI-ACCESS-TIMESTAMP";

/// Credential, environment and signer shared by the REST and streaming clients
#[derive(Clone)]
pub struct AuthContext {
    key_id: String,
    environment: Environment,
    signer: Arc<dyn Signer>,
}

impl AuthContext {
    /// Sign with the credential's own RSA key
    pub fn new(credentials: &Credentials, environment: Environment) -> Self {
        Self::with_signer(
            credentials.key_id(),
            environment,
            Arc::new(RsaPssSigner::from_credentials(credentials)),
        )
    }

    /// Sign through an injected [`Signer`]
    pub fn with_signer(
        key_id: impl Into<String>,
        environment: Environment,
        signer: Arc<dyn Signer>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            environment,
            signer,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Sign `method` + `path` at the current time
    pub fn sign_request(&self, method: HttpMethod, path: &str) -> AuthResult<SignedRequest> {
        self.sign_request_at(chrono::Utc::now().timestamp_millis(), method, path)
    }

    /// Sign `method` + `path` at a fixed timestamp
    pub fn sign_request_at(
        &self,
        timestamp_ms: i64,
        method: HttpMethod,
        path: &str,
    ) -> AuthResult<SignedRequest> {
        let path = strip_query(path);
        let message = canonical_message(timestamp_ms, method, path);
        let signature = self.signer.sign_base64(message.as_bytes())?;

        Ok(SignedRequest {
            timestamp_ms,
            method,
            path: path.to_string(),
            signature,
            key_id: self.key_id.clone(),
        })
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("key_id", &self.key_id)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

/// Auth material for exactly one outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub timestamp_ms: i64,
    pub method: HttpMethod,
    /// Signed path, query removed
    pub path: String,
    /// Base64 signature
    pub signature: String,
    pub key_id: String,
}

impl SignedRequest {
    /// The three auth headers as (name, value) pairs
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            (ACCESS_KEY_HEADER, self.key_id.clone()),
            (ACCESS_SIGNATURE_HEADER, self.signature.clone()),
            (ACCESS_TIMESTAMP_HEADER, self.timestamp_ms.to_string()),
        ]
    }

    /// Message that was signed
    pub fn message(&self) -> String {
        canonical_message(self.timestamp_ms, self.method, &self.path)
    }
}

/// `timestamp_ms + METHOD + path`
pub fn canonical_message(timestamp_ms: i64, method: HttpMethod, path: &str) -> String {
    format!("{timestamp_ms}{}{}", method.as_str(), strip_query(path))
}

fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(p, _)| p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::verify_signature;

    const PKCS8: &str = include_str!("../tests/fixtures/test_key_pkcs8.pem");

    #[test]
    fn test_canonical_message_strips_query() {
        assert_eq!(
            canonical_message(1703123456789, HttpMethod::Get, "/trade-api/v2/markets?limit=5&status=open"),
            "1703123456789GET/trade-api/v2/markets"
        );
        assert_eq!(
            canonical_message(1, HttpMethod::Delete, "/trade-api/v2/portfolio/orders/abc"),
            "1DELETE/trade-api/v2/portfolio/orders/abc"
        );
    }

    #[test]
    fn test_signed_request_verifies() {
        let creds = Credentials::from_pem_str("key-1", PKCS8).unwrap();
        let ctx = AuthContext::new(&creds, Environment::Sandbox);

        let signed = ctx
            .sign_request_at(1703123456789, HttpMethod::Post, "/trade-api/v2/portfolio/orders?x=1")
            .unwrap();
        assert_eq!(signed.path, "/trade-api/v2/portfolio/orders");
        assert_eq!(signed.message(), "1703123456789POST/trade-api/v2/portfolio/orders");

        let public = RsaPssSigner::from_credentials(&creds).public_key();
        assert!(verify_signature(&public, signed.message().as_bytes(), &signed.signature).is_ok());

        let headers = signed.headers();
        assert_eq!(headers[0], (ACCESS_KEY_HEADER, "key-1".to_string()));
        assert_eq!(headers[2].1, "1703123456789");
    }

    struct FixedSigner;

    impl Signer for FixedSigner {
        fn sign(&self, message: &[u8]) -> AuthResult<Vec<u8>> {
            Ok(message.to_vec())
        }
    }

    #[test]
    fn test_injected_signer() {
        let ctx = AuthContext::with_signer("k", Environment::Production, Arc::new(FixedSigner));
        let signed = ctx.sign_request_at(5, HttpMethod::Get, "/p").unwrap();
        // base64("5GET/p")
        assert_eq!(signed.signature, "NUdFVC9w");
        assert_eq!(ctx.environment(), Environment::Production);
    }
}
