//! Authenticator implementation
//!
//! Handles applying authentication to requests and obtaining tokens from
//! the login endpoint or a service-account token exchange.

use super::types::{AccessToken, AuthConfig, CachedToken};
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Cached token for Session/JWT auth
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token.secret())),
            AuthConfig::Session { .. } | AuthConfig::Jwt { .. } => {
                let token = self.get_or_refresh_token().await?;
                Ok(req.bearer_auth(token.secret()))
            }
        }
    }

    /// Obtain an access token for this configuration
    ///
    /// For session and JWT auth the token is fetched on first use and then
    /// cached until it expires.
    pub async fn access_token(&self) -> Result<AccessToken> {
        match &self.config {
            AuthConfig::Bearer { token } => Ok(token.clone()),
            AuthConfig::Session { .. } | AuthConfig::Jwt { .. } => {
                self.get_or_refresh_token().await
            }
        }
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(&self) -> Result<AccessToken> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_new_token().await?;
        let token = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token)
    }

    /// Fetch a new token based on auth type
    async fn fetch_new_token(&self) -> Result<CachedToken> {
        match &self.config {
            AuthConfig::Session {
                login_url,
                login_method,
                credential,
                token_path,
            } => {
                self.fetch_session_token(login_url, login_method.clone(), credential, token_path)
                    .await
            }

            AuthConfig::Jwt {
                issuer,
                audience,
                private_key,
                key_id,
                token_lifetime_seconds,
                claims,
                token_url,
            } => {
                let assertion = JwtAssertion {
                    issuer,
                    audience,
                    private_key,
                    key_id: key_id.as_deref(),
                    lifetime_seconds: *token_lifetime_seconds,
                    extra_claims: claims,
                };
                self.generate_jwt(&assertion, token_url.as_deref()).await
            }

            AuthConfig::Bearer { .. } => Err(Error::auth(
                "Token refresh not supported for bearer auth",
            )),
        }
    }

    /// Exchange the credential at the login endpoint
    ///
    /// Only a 200 response is accepted. Any other status is an auth error,
    /// and so are transport failures and undecodable bodies. The login
    /// token carries no expiry and is kept for the whole run.
    async fn fetch_session_token(
        &self,
        login_url: &str,
        login_method: reqwest::Method,
        credential: &AccessToken,
        token_path: &str,
    ) -> Result<CachedToken> {
        debug!("Logging in at {}", login_url);

        let response = self
            .http_client
            .request(login_method, login_url)
            .bearer_auth(credential.secret())
            .send()
            .await
            .map_err(|e| Error::auth(format!("Login request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(format!(
                "Login failed with status {}: {body}",
                status.as_u16()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::auth(format!("Failed to read login response: {e}")))?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| Error::auth(format!("Failed to decode login response: {e}")))?;

        let token = resolve_path(&body, token_path)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::auth(format!("Login response has no string at path: {token_path}"))
            })?;

        Ok(CachedToken::new(token, None))
    }

    /// Generate a JWT and optionally exchange it for an access token
    async fn generate_jwt(
        &self,
        assertion: &JwtAssertion<'_>,
        token_url: Option<&str>,
    ) -> Result<CachedToken> {
        let jwt = assertion.sign()?;

        // Google-style: the signed assertion is traded for an access token
        if let Some(url) = token_url {
            debug!("Exchanging JWT assertion at {}", url);

            let form = [
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ];

            let response = self
                .http_client
                .post(url)
                .form(&form)
                .send()
                .await
                .map_err(|e| Error::auth(format!("Token exchange request failed: {e}")))?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::jwt(format!(
                    "JWT token exchange failed with status {status}: {body}"
                )));
            }

            let token_response: TokenResponse = response
                .json()
                .await
                .map_err(|e| Error::auth(format!("Failed to decode token response: {e}")))?;
            Ok(token_response.into_cached_token())
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(CachedToken::expires_in(
                jwt,
                assertion.lifetime_seconds as i64,
            ))
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Everything needed to sign one JWT assertion
struct JwtAssertion<'a> {
    issuer: &'a str,
    audience: &'a str,
    private_key: &'a str,
    key_id: Option<&'a str>,
    lifetime_seconds: u64,
    extra_claims: &'a HashMap<String, String>,
}

impl JwtAssertion<'_> {
    fn sign(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        #[allow(clippy::cast_possible_wrap)]
        let exp = now + self.lifetime_seconds as i64;

        let claims = JwtClaims {
            iss: self.issuer.to_string(),
            aud: self.audience.to_string(),
            iat: now,
            exp,
            extra: self.extra_claims.clone(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.map(String::from);

        let encoding_key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| Error::jwt(format!("Invalid private key: {e}")))?;

        encode(&header, &claims, &encoding_key)
            .map_err(|e| Error::jwt(format!("Failed to encode JWT: {e}")))
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
    #[serde(flatten)]
    extra: HashMap<String, String>,
}

/// Walk a dotted path such as `$.data.token` or `access_token`
fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.').try_fold(value, |current, part| match current {
        Value::Object(map) => map.get(part),
        _ => None,
    })
}
