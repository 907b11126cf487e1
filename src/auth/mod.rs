//! Authentication module
//!
//! Supports: Bearer, Session (login endpoint), JWT (service account)
//!
//! The `Authenticator` handles all auth types and manages token caching
//! for auth types that fetch their token from a remote endpoint.

mod authenticator;
mod service_account;
mod types;

pub use authenticator::Authenticator;
pub use service_account::{ServiceAccountKey, DEFAULT_TOKEN_URI, SPREADSHEETS_SCOPE};
pub use types::{AccessToken, AuthConfig, CachedToken, LOGIN_PATH};
