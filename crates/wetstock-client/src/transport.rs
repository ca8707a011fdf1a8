//! Transport abstraction for service calls.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wetstock_types::{Result, WetstockError};

/// A raw service response: status code plus undecoded body.
///
/// Decoding is left to the caller because endpoints disagree on what a
/// non-success status or an undecodable body means.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Bytes,
}

impl RawResponse {
    /// Creates a response from a status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying JSON error; callers map it to the policy of
    /// their endpoint.
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// A transport delivers one POST request to a service endpoint.
///
/// This trait abstracts the network layer so the service clients can be
/// driven by the HTTP implementation in production and a scripted mock in
/// tests. The transport owns the shared-secret credential; callers pass
/// only endpoint-specific parameters.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POSTs to `path` with the given query parameters and optional JSON
    /// body, returning the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level failures (after the
    /// transport's retry policy is exhausted). Non-success statuses are
    /// returned as responses, not errors.
    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<RawResponse>;
}

/// One request observed by a [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Endpoint path.
    pub path: String,
    /// Query parameters as sent.
    pub query: Vec<(String, String)>,
    /// JSON body, when one was sent.
    pub body: Option<Value>,
}

impl RecordedCall {
    /// Returns the first value of the named query parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A scripted transport for tests.
///
/// Responses are queued per endpoint path and consumed in order; every
/// request is recorded for assertions.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<RawResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Creates an empty mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for `path` with a pre-encoded body.
    pub fn push_response(&self, path: &str, status: u16, body: impl Into<Bytes>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(RawResponse::new(status, body));
    }

    /// Queues a JSON response for `path`.
    pub fn push_json(&self, path: &str, status: u16, body: Value) {
        self.push_response(path, status, serde_json::to_vec(&body).unwrap());
    }

    /// Returns all recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the recorded calls for one endpoint path.
    #[must_use]
    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.path == path)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(key, value)| ((*key).to_string(), value.clone()))
                .collect(),
            body: body.cloned(),
        });

        self.responses
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                WetstockError::Transport(format!("no scripted response for {path}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_pops_in_order() {
        let transport = MockTransport::new();
        transport.push_json("/a", 200, serde_json::json!({"n": 1}));
        transport.push_json("/a", 200, serde_json::json!({"n": 2}));

        let first = transport.post("/a", &[], None).await.unwrap();
        let second = transport.post("/a", &[], None).await.unwrap();
        assert_eq!(first.json::<Value>().unwrap()["n"], 1);
        assert_eq!(second.json::<Value>().unwrap()["n"], 2);
    }

    #[tokio::test]
    async fn test_mock_unscripted_path_errors() {
        let transport = MockTransport::new();
        let result = transport.post("/missing", &[], None).await;
        assert!(matches!(result, Err(WetstockError::Transport(_))));
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let transport = MockTransport::new();
        transport.push_json("/a", 200, Value::Null);
        transport
            .post("/a", &[("skip", "0".to_string())], Some(&serde_json::json!({})))
            .await
            .unwrap();

        let calls = transport.calls_to("/a");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].param("skip"), Some("0"));
        assert_eq!(calls[0].body, Some(serde_json::json!({})));
    }
}
