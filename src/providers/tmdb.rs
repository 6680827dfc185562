use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

use crate::app_config::{Config, MediaKind};
use crate::dump::document::Credits;
use crate::dump::merge::Translation;
use crate::errors::ProviderError;

use super::{parse_credits, parse_details, parse_latest_id, parse_translations, MediaApi};

/// Client for the TMDB v3 REST API
///
/// A single instance is shared by every worker so that connections are pooled.
#[derive(Debug, Clone)]
pub struct Tmdb {
    /// Base URL, e.g. `https://api.themoviedb.org/3`
    base_url: Url,
    /// API key sent with every request
    api_key: String,
    /// HTTP client for making requests
    client: Client,
}

impl Tmdb {
    /// Create a new client
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::RequestFailed(format!("invalid base URL {}: {}", base_url, e)))?;

        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a client from the application configuration
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Self::new(&config.api_base_url, config.api_key.clone(), config.request_timeout())
    }

    /// Build `{base}/{segments...}?api_key=...[&extra...]`
    pub fn endpoint(&self, segments: &[&str], extra_query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            for (key, value) in extra_query {
                query.append_pair(key, value);
            }
        }
        url
    }

    /// GET a URL and decode the JSON body, requiring exactly HTTP 200
    async fn get_json(&self, url: Url) -> Result<Value, ProviderError> {
        debug!("GET {}{}", url.host_str().unwrap_or_default(), url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl MediaApi for Tmdb {
    async fn latest_id(&self, kind: MediaKind) -> Result<u64, ProviderError> {
        let body = self.get_json(self.endpoint(&[kind.path_segment(), "latest"], &[])).await?;
        parse_latest_id(body)
    }

    async fn translations(&self, kind: MediaKind, id: u64) -> Result<Vec<Translation>, ProviderError> {
        let id = id.to_string();
        let body = self
            .get_json(self.endpoint(&[kind.path_segment(), &id, "translations"], &[]))
            .await?;
        parse_translations(body)
    }

    async fn details(
        &self,
        kind: MediaKind,
        id: u64,
        language: &str,
    ) -> Result<Map<String, Value>, ProviderError> {
        let id = id.to_string();
        let body = self
            .get_json(self.endpoint(&[kind.path_segment(), &id], &[("language", language)]))
            .await?;
        parse_details(body)
    }

    async fn credits(&self, kind: MediaKind, id: u64) -> Result<Credits, ProviderError> {
        let id = id.to_string();
        let body = self
            .get_json(self.endpoint(&[kind.path_segment(), &id, "credits"], &[]))
            .await?;
        parse_credits(body)
    }
}
