//! Auth configuration types
//!
//! These types represent the runtime auth configuration once credentials
//! have been loaded from the environment or a key file.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

/// Authentication configuration
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Bearer token authentication with an already issued token
    Bearer {
        /// The bearer token
        token: AccessToken,
    },

    /// Session login: a credential is exchanged at a login endpoint for
    /// a short-lived access token
    Session {
        /// Login endpoint URL
        login_url: String,
        /// HTTP method for login
        login_method: reqwest::Method,
        /// Credential sent as a bearer token to the login endpoint
        credential: AccessToken,
        /// Path to the token in the login response (e.g. "access_token")
        token_path: String,
    },

    /// RS256 JWT authentication (service account style)
    Jwt {
        /// Token issuer (iss claim)
        issuer: String,
        /// Token audience (aud claim)
        audience: String,
        /// Private key for signing (PEM format)
        private_key: String,
        /// Key identifier placed in the JWT header
        key_id: Option<String>,
        /// Token lifetime in seconds
        token_lifetime_seconds: u64,
        /// Additional claims (e.g. "scope")
        claims: HashMap<String, String>,
        /// Optional token endpoint for two-step auth (like Google)
        token_url: Option<String>,
    },
}

/// Login endpoint of the status API, relative to its base URL
pub const LOGIN_PATH: &str = "/api/v1/login";

impl AuthConfig {
    /// Bearer auth with an already issued token
    pub fn bearer(token: impl Into<AccessToken>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Status API login: `GET {login_url}` with the admin credential as a
    /// bearer token, answering `{"access_token": "..."}`
    pub fn admin_login(login_url: impl Into<String>, credential: impl Into<AccessToken>) -> Self {
        Self::Session {
            login_url: login_url.into(),
            login_method: reqwest::Method::GET,
            credential: credential.into(),
            token_path: "access_token".to_string(),
        }
    }
}

/// An opaque access token, held in memory only
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for placing in an `Authorization` header
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: AccessToken,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: impl Into<AccessToken>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: impl Into<AccessToken>, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token: token.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}
