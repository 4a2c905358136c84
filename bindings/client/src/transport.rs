use analysis_probe_core::prelude::DebugPayload;
use anyhow::Context;
use url::Url;

/// Extra request headers as `(name, value)` pairs.
pub type Headers = Vec<(String, String)>;

/// Status and raw body of an HTTP response.
///
/// The body is only decoded when [ApiResponse::json] is called, so responses with an error page
/// instead of JSON can still be stored and inspected by status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(&self) -> anyhow::Result<serde_json::Value> {
        serde_json::from_str(&self.body).with_context(|| {
            format!(
                "Response body with status {} is not valid JSON",
                self.status
            )
        })
    }
}

impl DebugPayload for ApiResponse {
    fn debug_payload(&self) -> Option<serde_json::Value> {
        self.json().ok()?.debug_payload()
    }
}

/// The blocking HTTP calls the API clients need.
///
/// Implementations must return non-2xx responses as `Ok`; only failures to get a response at all
/// are errors.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &Url, headers: &[(String, String)]) -> anyhow::Result<ApiResponse>;

    fn post_json(
        &self,
        url: &Url,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> anyhow::Result<ApiResponse>;
}
