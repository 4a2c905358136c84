use crate::transport::{ApiResponse, HttpTransport};
use parking_lot::Mutex;
use std::collections::VecDeque;
use url::Url;

/// A request seen by a [ScriptedTransport].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An in-memory [HttpTransport] that answers requests with queued responses, in order, and
/// records every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<anyhow::Result<ApiResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.push_response(status, body);
        self
    }

    pub fn with_json(self, status: u16, body: serde_json::Value) -> Self {
        self.with_response(status, body.to_string())
    }

    /// Queue `count` identical responses.
    pub fn with_repeated(self, count: usize, status: u16, body: &str) -> Self {
        for _ in 0..count {
            self.push_response(status, body);
        }
        self
    }

    /// Queue a failure to get any response, such as a refused connection.
    pub fn with_error(self, msg: &str) -> Self {
        self.responses
            .lock()
            .push_back(Err(anyhow::anyhow!(msg.to_string())));
        self
    }

    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }

    fn answer(&self, request: RecordedRequest) -> anyhow::Result<ApiResponse> {
        let description = format!("{} {}", request.method, request.url);
        self.requests.lock().push(request);

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("No scripted response left for {description}")))
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(&self, url: &Url, headers: &[(String, String)]) -> anyhow::Result<ApiResponse> {
        self.answer(RecordedRequest {
            method: "GET",
            url: url.clone(),
            headers: headers.to_vec(),
            body: None,
        })
    }

    fn post_json(
        &self,
        url: &Url,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> anyhow::Result<ApiResponse> {
        self.answer(RecordedRequest {
            method: "POST",
            url: url.clone(),
            headers: headers.to_vec(),
            body: Some(body.clone()),
        })
    }
}
