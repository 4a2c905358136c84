use crate::transport::{ApiResponse, HttpTransport};
use anyhow::Context;
use reqwest::blocking::{Client, RequestBuilder};
use std::time::Duration;
use url::Url;

/// [HttpTransport] backed by a blocking `reqwest` client.
///
/// The client keeps a connection pool, so each worker thread should own its own transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    fn send(request: RequestBuilder, method: &str, url: &Url) -> anyhow::Result<ApiResponse> {
        let response = request
            .send()
            .with_context(|| format!("{method} {url} failed"))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .with_context(|| format!("Failed to read response body of {method} {url}"))?;

        log::trace!("{method} {url} -> {status}");

        Ok(ApiResponse { status, body })
    }
}

fn with_headers(mut request: RequestBuilder, headers: &[(String, String)]) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    request
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &Url, headers: &[(String, String)]) -> anyhow::Result<ApiResponse> {
        let request = with_headers(self.client.get(url.clone()), headers);
        Self::send(request, "GET", url)
    }

    fn post_json(
        &self,
        url: &Url,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> anyhow::Result<ApiResponse> {
        let request = with_headers(self.client.post(url.clone()), headers).json(body);
        Self::send(request, "POST", url)
    }
}
