use crate::auth::{authorization, AccessToken};
use crate::instrument;
use crate::transport::{ApiResponse, HttpTransport};
use analysis_probe_instruments::Reporter;
use anyhow::Context;
use std::sync::Arc;
use url::Url;

pub const COMPONENT_SEARCH_PATH: &str = "api/v1/component-search";
pub const COMPONENT_ANALYSES_PATH: &str = "api/v1/component-analyses";
const STACK_ANALYSES_PATH: &str = "api/v1/stack-analyses";
const READINESS_PATH: &str = "api/v1/readiness";

/// Instrumented client for the core API: component search, component analysis and stack
/// analysis.
///
/// Paths are joined onto the base URL, so the base URL should end with a `/`.
#[derive(Clone)]
pub struct CoreApi {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    access_token: Option<AccessToken>,
    reporter: Option<Arc<Reporter>>,
}

impl CoreApi {
    pub fn new(base_url: Url, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url,
            transport,
            access_token: None,
            reporter: None,
        }
    }

    pub fn with_access_token(mut self, access_token: Option<AccessToken>) -> Self {
        self.access_token = access_token;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Cannot join '{path}' onto {}", self.base_url))
    }

    /// URL of the component analysis of `ecosystem`/`component`/`version`.
    pub fn component_analysis_url(
        &self,
        ecosystem: &str,
        component: &str,
        version: &str,
    ) -> anyhow::Result<Url> {
        self.url(&format!(
            "{COMPONENT_ANALYSES_PATH}/{ecosystem}/{component}/{version}"
        ))
    }

    /// GET the readiness endpoint of the core API.
    pub fn readiness(&self) -> anyhow::Result<ApiResponse> {
        instrument(self.reporter.as_deref(), "core_api.readiness", || {
            self.transport.get(&self.url(READINESS_PATH)?, &[])
        })
    }

    /// Search for components whose name matches `component`.
    pub fn component_search(
        &self,
        component: &str,
        use_token: bool,
    ) -> anyhow::Result<ApiResponse> {
        instrument(self.reporter.as_deref(), "core_api.component_search", || {
            let headers = authorization(self.access_token.as_ref(), use_token, "component search")?;
            let url = self.url(&format!("{COMPONENT_SEARCH_PATH}/{component}"))?;
            self.transport.get(&url, &headers)
        })
    }

    /// Read the analysis of a component. Asking for an analysis that does not exist yet also
    /// schedules it on the service side.
    pub fn component_analysis(
        &self,
        ecosystem: &str,
        component: &str,
        version: &str,
        use_token: bool,
    ) -> anyhow::Result<ApiResponse> {
        instrument(self.reporter.as_deref(), "core_api.component_analysis", || {
            let headers =
                authorization(self.access_token.as_ref(), use_token, "component analysis")?;
            let url = self.component_analysis_url(ecosystem, component, version)?;
            self.transport.get(&url, &headers)
        })
    }

    /// Submit a stack manifest for analysis.
    pub fn stack_analysis(&self, manifest: &serde_json::Value) -> anyhow::Result<ApiResponse> {
        instrument(self.reporter.as_deref(), "core_api.stack_analysis", || {
            let headers = authorization(
                self.access_token.as_ref(),
                self.has_access_token(),
                "stack analysis",
            )?;
            self.transport
                .post_json(&self.url(STACK_ANALYSES_PATH)?, &headers, manifest)
        })
    }
}
