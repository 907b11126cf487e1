//! Google service-account key files
//!
//! Parses the JSON key downloaded from the Cloud console and turns it into
//! a JWT-bearer [`AuthConfig`].

use super::types::AuthConfig;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// OAuth scope granting read/write access to spreadsheets
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Token endpoint used when a key file does not carry `token_uri`
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime Google accepts for a self-signed assertion
const ASSERTION_LIFETIME_SECONDS: u64 = 3600;

/// The fields of a service-account key file that the JWT flow needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Always "service_account" for keys this tool accepts
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    /// Service account email, used as the JWT issuer
    pub client_email: String,
    /// PEM encoded RSA private key
    pub private_key: String,
    /// Key identifier, placed in the JWT header
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parse a key from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(json)
            .map_err(|e| Error::decode("service account key", e.to_string()))?;

        if let Some(kind) = key.key_type.as_deref() {
            if kind != "service_account" {
                return Err(Error::config(format!(
                    "credentials file has type '{kind}', expected 'service_account'"
                )));
            }
        }
        Ok(key)
    }

    /// Read and parse a key file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Unable to read credentials file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }

    /// Build the JWT-bearer auth config for the given scopes
    pub fn auth_config(&self, scopes: &[&str]) -> AuthConfig {
        let mut claims = HashMap::new();
        claims.insert("scope".to_string(), scopes.join(" "));

        AuthConfig::Jwt {
            issuer: self.client_email.clone(),
            audience: self.token_uri.clone(),
            private_key: self.private_key.clone(),
            key_id: self.private_key_id.clone(),
            token_lifetime_seconds: ASSERTION_LIFETIME_SECONDS,
            claims,
            token_url: Some(self.token_uri.clone()),
        }
    }
}
