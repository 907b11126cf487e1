//! JSON response decoding
//!
//! All payloads this tool consumes are JSON. Decoding goes through these
//! helpers so that a malformed body always surfaces as [`Error::Decode`]
//! naming what was being decoded.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;

/// Decode a JSON document into `T`
pub fn decode_json<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::decode(what, e.to_string()))
}

/// Read a response body and decode it as JSON
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| Error::decode(what, format!("failed to read response body: {e}")))?;
    decode_json(&body, what)
}
