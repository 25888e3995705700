//! RSA-PSS request signing for the Kalshi trading API
//!
//! Every authenticated request, and the streaming handshake, carries three
//! headers: the API key id, a millisecond timestamp, and an RSA-PSS signature
//! over `timestamp + METHOD + path`.
//!
//! # Example
//!
//! ```no_run
//! use kalshi_auth::{AuthContext, Credentials};
//! use kalshi_types::{Environment, HttpMethod};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads KALSHI_API_KEY_ID and KALSHI_PRIVATE_KEY_PATH
//!     let creds = Credentials::from_env()?;
//!     let auth = AuthContext::new(&creds, Environment::Sandbox);
//!
//!     let signed = auth.sign_request(HttpMethod::Get, "/trade-api/v2/portfolio/balance")?;
//!     for (name, value) in signed.headers() {
//!         println!("{name}: {value}");
//!     }
//!     Ok(())
//! }
//! ```

mod context;
mod credentials;
mod error;
mod signer;

pub use context::{
    canonical_message, AuthContext, SignedRequest, ACCESS_KEY_HEADER, ACCESS_SIGNATURE_HEADER,
    ACCESS_TIMESTAMP_HEADER,
};
pub use credentials::{Credentials, KEY_ID_ENV, PRIVATE_KEY_PATH_ENV};
pub use error::{AuthError, AuthResult};
pub use signer::{verify_signature, RsaPssSigner, Signer};
