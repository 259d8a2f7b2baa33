//! Mock HTTP client for testing.
//!
//! Routes are keyed by method and URL. One-shot responses queued with
//! [`MockHttpClient::enqueue_response`] are served first, in order; after
//! that the persistent response for the route (or the default) applies.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, HttpRequest, Method, RequestBody, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// URL including the query string
    pub url: String,
    pub headers: Headers,
    pub body: RequestBody,
}

impl RecordedRequest {
    /// Header lookup ignoring name case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Number of headers with the given name, ignoring case.
    pub fn header_count(&self, name: &str) -> usize {
        self.headers
            .keys()
            .filter(|key| key.eq_ignore_ascii_case(name))
            .count()
    }
}

/// Configured outcome for a route.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(Response),
    Error(HttpError),
}

impl MockResponse {
    /// JSON response with the given status.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_body(status, &value))
    }

    /// Empty-bodied response with the given status.
    pub fn status(status: u16) -> Self {
        MockResponse::Success(Response::new(status, bytes::Bytes::new()))
    }
}

type RouteKey = (Method, String);

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use sigmalite::adapters::mock::{MockHttpClient, MockResponse};
/// use sigmalite::traits::Method;
///
/// let client = MockHttpClient::new();
/// client.enqueue_response(Method::Get, "http://api/api/datasets", MockResponse::status(401));
/// client.set_response(Method::Get, "http://api/api/datasets", MockResponse::json(200, json!([])));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<RouteKey, MockResponse>>>,
    queued: Arc<Mutex<HashMap<RouteKey, VecDeque<MockResponse>>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    latency: Arc<Mutex<Option<Duration>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the persistent response for a route.
    pub fn set_response(&self, method: Method, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert((method, url.to_string()), response);
    }

    /// Queue a one-shot response for a route.
    pub fn enqueue_response(&self, method: Method, url: &str, response: MockResponse) {
        let mut queued = self.queued.lock().unwrap();
        queued
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Response used when no route matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Delay every response, letting concurrent callers interleave.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests whose URL (without query) equals `url`.
    pub fn requests_to(&self, method: Method, url: &str) -> Vec<RecordedRequest> {
        self.get_requests()
            .into_iter()
            .filter(|r| r.method == method && r.url.split('?').next() == Some(url))
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, request: &HttpRequest) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.full_url(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });
    }

    fn next_response(&self, request: &HttpRequest) -> Option<MockResponse> {
        let key = (request.method, request.url.clone());

        if let Some(queue) = self.queued.lock().unwrap().get_mut(&key) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        if let Some(response) = self.responses.lock().unwrap().get(&key) {
            return Some(response.clone());
        }

        self.default_response.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &HttpRequest) -> Result<Response, HttpError> {
        self.record_request(request);
        let response = self.next_response(request);

        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match response {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                request.method, request.url
            ))),
        }
    }
}
