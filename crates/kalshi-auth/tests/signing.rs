//! Signing behaviour through the public API

use std::sync::Arc;

use kalshi_auth::{verify_signature, AuthContext, Credentials, RsaPssSigner};
use kalshi_types::{Environment, HttpMethod};

const PKCS1: &str = include_str!("fixtures/test_key_pkcs1.pem");

#[tokio::test]
async fn test_concurrent_signing_from_shared_context() {
    let creds = Credentials::from_pem_str("key-1", PKCS1).unwrap();
    let public = RsaPssSigner::from_credentials(&creds).public_key();
    let ctx = Arc::new(AuthContext::new(&creds, Environment::Production));

    let mut handles = Vec::new();
    for i in 0..8 {
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            ctx.sign_request(HttpMethod::Get, &format!("/trade-api/v2/markets/T-{i}?depth=5"))
                .unwrap()
        }));
    }

    for handle in handles {
        let signed = handle.await.unwrap();
        assert!(!signed.path.contains('?'));
        assert!(verify_signature(&public, signed.message().as_bytes(), &signed.signature).is_ok());
    }
}

#[test]
fn test_fresh_signature_per_request() {
    let creds = Credentials::from_pem_str("key-1", PKCS1).unwrap();
    let ctx = AuthContext::new(&creds, Environment::Sandbox);

    let a = ctx.sign_request_at(42, HttpMethod::Get, "/trade-api/ws/v2").unwrap();
    let b = ctx.sign_request_at(42, HttpMethod::Get, "/trade-api/ws/v2").unwrap();
    assert_eq!(a.message(), b.message());
    assert_ne!(a.signature, b.signature);
}
