/*!
 * Clients for the upstream media database API.
 *
 * This module contains the seam between the download pipeline and the network:
 * - `MediaApi`: the four read-only calls the pipeline needs
 * - `tmdb`: the live HTTP client
 * - `mock`: scripted in-memory responses for tests
 */

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt::Debug;

use crate::app_config::MediaKind;
use crate::dump::document::Credits;
use crate::dump::merge::Translation;
use crate::errors::ProviderError;

/// Fixed locale of the primary-language detail request
pub const PRIMARY_LOCALE: &str = "en-US";

/// Read-only access to the media database.
///
/// Every call fails with `ProviderError::ApiError` when the API answers with
/// anything other than HTTP 200, so callers can tag the failure with its stage.
#[async_trait]
pub trait MediaApi: Send + Sync + Debug {
    /// ID of the most recently added entity of this kind
    async fn latest_id(&self, kind: MediaKind) -> Result<u64, ProviderError>;

    /// Translation variants of one entity, in response order
    async fn translations(&self, kind: MediaKind, id: u64) -> Result<Vec<Translation>, ProviderError>;

    /// Detail object of one entity in the given locale
    async fn details(
        &self,
        kind: MediaKind,
        id: u64,
        language: &str,
    ) -> Result<Map<String, Value>, ProviderError>;

    /// Cast and crew of one entity
    async fn credits(&self, kind: MediaKind, id: u64) -> Result<Credits, ProviderError>;
}

/// Extract the `id` field of a "latest" response
pub fn parse_latest_id(body: Value) -> Result<u64, ProviderError> {
    body.get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| ProviderError::ParseError("latest response has no numeric 'id'".to_string()))
}

/// Extract the `translations` array of a translations response
pub fn parse_translations(mut body: Value) -> Result<Vec<Translation>, ProviderError> {
    let translations = body
        .get_mut("translations")
        .map(Value::take)
        .ok_or_else(|| ProviderError::ParseError("missing 'translations'".to_string()))?;
    serde_json::from_value(translations)
        .map_err(|e| ProviderError::ParseError(format!("invalid translations: {}", e)))
}

/// A detail response must be a JSON object
pub fn parse_details(body: Value) -> Result<Map<String, Value>, ProviderError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(ProviderError::ParseError(format!(
            "detail response is not an object: {}",
            other
        ))),
    }
}

/// Keep only `cast` and `crew` of a credits response
pub fn parse_credits(body: Value) -> Result<Credits, ProviderError> {
    serde_json::from_value(body)
        .map_err(|e| ProviderError::ParseError(format!("invalid credits: {}", e)))
}

pub mod mock;
pub mod tmdb;
