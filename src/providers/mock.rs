/*!
 * Scripted media database for testing.
 *
 * `MockMediaApi` answers from an in-memory table instead of the network:
 * - entities registered with `with_entity` answer all three sub-resources
 * - `with_status` forces a non-200 answer for one endpoint of one entity
 * - `with_body` replaces one endpoint's JSON body (e.g. to make it malformed)
 * - everything else answers 404, like a deleted ID upstream
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::MediaKind;
use crate::dump::document::Credits;
use crate::dump::merge::Translation;
use crate::errors::ProviderError;

use super::{parse_credits, parse_details, parse_latest_id, parse_translations, MediaApi};

/// Upstream endpoint families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Latest,
    Translations,
    Details,
    Credits,
}

/// Scripted answer for one endpoint
#[derive(Debug, Clone)]
pub enum MockAnswer {
    /// HTTP 200 with this body
    Body(Value),
    /// Any other HTTP status
    Status(u16),
    /// Transport failure
    Disconnect,
}

#[derive(Debug, Default)]
struct Script {
    latest: Option<MockAnswer>,
    answers: HashMap<(Endpoint, u64), MockAnswer>,
}

/// Mock media database for tests
#[derive(Debug, Clone, Default)]
pub struct MockMediaApi {
    script: Arc<Mutex<Script>>,
    /// Every call in arrival order
    calls: Arc<Mutex<Vec<(Endpoint, u64)>>>,
    /// Calls currently being answered
    in_flight: Arc<AtomicUsize>,
    /// Highest value `in_flight` reached
    peak_in_flight: Arc<AtomicUsize>,
    /// Artificial latency per call
    latency: Option<Duration>,
}

impl MockMediaApi {
    /// Create an empty mock where every entity is missing
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the "latest" endpoint with this ID
    pub fn with_latest_id(self, id: u64) -> Self {
        self.script.lock().latest = Some(MockAnswer::Body(json!({ "id": id })));
        self
    }

    /// Register a complete entity
    pub fn with_entity(self, id: u64, translations: Value, details: Value, credits: Value) -> Self {
        {
            let mut script = self.script.lock();
            script.answers.insert(
                (Endpoint::Translations, id),
                MockAnswer::Body(json!({ "id": id, "translations": translations })),
            );
            script.answers.insert((Endpoint::Details, id), MockAnswer::Body(details));
            script.answers.insert((Endpoint::Credits, id), MockAnswer::Body(credits));
        }
        self
    }

    /// Register a plain movie with one French translation and empty credits
    pub fn with_sample_movie(self, id: u64) -> Self {
        self.with_entity(
            id,
            json!([{ "iso_639_1": "fr", "iso_3166_1": "FR",
                     "data": { "title": format!("Film {}", id), "overview": "o", "tagline": "t" } }]),
            json!({ "id": id, "title": format!("Movie {}", id), "overview": "Ov", "tagline": "Tag" }),
            json!({ "id": id, "cast": [], "crew": [] }),
        )
    }

    /// Force an HTTP status for one endpoint of one entity
    pub fn with_status(self, endpoint: Endpoint, id: u64, status_code: u16) -> Self {
        self.with_answer(endpoint, id, MockAnswer::Status(status_code))
    }

    /// Replace the 200 body of one endpoint of one entity
    pub fn with_body(self, endpoint: Endpoint, id: u64, body: Value) -> Self {
        self.with_answer(endpoint, id, MockAnswer::Body(body))
    }

    /// Script an arbitrary answer
    pub fn with_answer(self, endpoint: Endpoint, id: u64, answer: MockAnswer) -> Self {
        if endpoint == Endpoint::Latest {
            self.script.lock().latest = Some(answer);
        } else {
            self.script.lock().answers.insert((endpoint, id), answer);
        }
        self
    }

    /// Delay every answer
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Calls received so far, in arrival order
    pub fn calls(&self) -> Vec<(Endpoint, u64)> {
        self.calls.lock().clone()
    }

    /// Number of calls made to one endpoint
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls.lock().iter().filter(|(e, _)| *e == endpoint).count()
    }

    /// Highest number of calls that were being answered at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn answer(&self, endpoint: Endpoint, id: u64) -> Result<Value, ProviderError> {
        self.calls.lock().push((endpoint, id));
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let answer = {
            let script = self.script.lock();
            match endpoint {
                Endpoint::Latest => script.latest.clone(),
                _ => script.answers.get(&(endpoint, id)).cloned(),
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match answer.unwrap_or(MockAnswer::Status(404)) {
            MockAnswer::Body(body) => Ok(body),
            MockAnswer::Status(status_code) => Err(ProviderError::ApiError {
                status_code,
                message: "The resource you requested could not be found.".to_string(),
            }),
            MockAnswer::Disconnect => Err(ProviderError::ConnectionError(
                "simulated connection reset".to_string(),
            )),
        }
    }
}

#[async_trait]
impl MediaApi for MockMediaApi {
    async fn latest_id(&self, _kind: MediaKind) -> Result<u64, ProviderError> {
        parse_latest_id(self.answer(Endpoint::Latest, 0).await?)
    }

    async fn translations(&self, _kind: MediaKind, id: u64) -> Result<Vec<Translation>, ProviderError> {
        parse_translations(self.answer(Endpoint::Translations, id).await?)
    }

    async fn details(
        &self,
        _kind: MediaKind,
        id: u64,
        _language: &str,
    ) -> Result<Map<String, Value>, ProviderError> {
        parse_details(self.answer(Endpoint::Details, id).await?)
    }

    async fn credits(&self, _kind: MediaKind, id: u64) -> Result<Credits, ProviderError> {
        parse_credits(self.answer(Endpoint::Credits, id).await?)
    }
}
