use analysis_api_client_instrumented::prelude::{
    AccessToken, CoreApi, GremlinApi, HttpTransport, JobsApi, ReqwestTransport, Reporter, Url,
};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

enum TransportSource {
    /// A new HTTP client per [ApiEndpoints::connect] call.
    Http { timeout: Duration },
    Shared(Arc<dyn HttpTransport>),
}

/// Where the benchmarked APIs live, and how to reach them.
///
/// Worker threads each call [ApiEndpoints::connect] to build clients of their own.
pub struct ApiEndpoints {
    core_api_url: Url,
    jobs_api_url: Option<Url>,
    gremlin_url: Option<Url>,
    access_token: Option<AccessToken>,
    reporter: Option<Arc<Reporter>>,
    transport: TransportSource,
}

impl ApiEndpoints {
    pub fn new(core_api_url: Url, http_timeout: Duration) -> Self {
        Self {
            core_api_url,
            jobs_api_url: None,
            gremlin_url: None,
            access_token: None,
            reporter: None,
            transport: TransportSource::Http {
                timeout: http_timeout,
            },
        }
    }

    /// Send every request of every client through `transport` instead of a new HTTP client.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = TransportSource::Shared(transport);
        self
    }

    pub fn with_jobs_api(mut self, url: Option<Url>) -> Self {
        self.jobs_api_url = url;
        self
    }

    pub fn with_gremlin(mut self, url: Option<Url>) -> Self {
        self.gremlin_url = url;
        self
    }

    pub fn with_access_token(mut self, access_token: Option<AccessToken>) -> Self {
        self.access_token = access_token;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build a set of clients for the configured endpoints.
    pub fn connect(&self) -> anyhow::Result<Clients> {
        let transport: Arc<dyn HttpTransport> = match &self.transport {
            TransportSource::Http { timeout } => Arc::new(ReqwestTransport::new(*timeout)?),
            TransportSource::Shared(transport) => transport.clone(),
        };

        let mut core_api = CoreApi::new(self.core_api_url.clone(), transport.clone())
            .with_access_token(self.access_token.clone());
        let mut jobs_api = self.jobs_api_url.clone().map(|url| {
            JobsApi::new(url, transport.clone()).with_access_token(self.access_token.clone())
        });
        let mut gremlin_api = self
            .gremlin_url
            .clone()
            .map(|url| GremlinApi::new(url, transport.clone()));

        if let Some(reporter) = &self.reporter {
            core_api = core_api.with_reporter(reporter.clone());
            jobs_api = jobs_api.map(|api| api.with_reporter(reporter.clone()));
            gremlin_api = gremlin_api.map(|api| api.with_reporter(reporter.clone()));
        }

        Ok(Clients {
            core_api,
            jobs_api,
            gremlin_api,
        })
    }
}

/// The API clients owned by one benchmark worker.
pub struct Clients {
    pub core_api: CoreApi,
    jobs_api: Option<JobsApi>,
    gremlin_api: Option<GremlinApi>,
}

impl Clients {
    pub fn jobs_api(&self) -> anyhow::Result<&JobsApi> {
        self.jobs_api
            .as_ref()
            .context("No jobs API URL configured, set `--jobs-api-url` or `JOBS_API_URL`")
    }

    pub fn gremlin_api(&self) -> anyhow::Result<&GremlinApi> {
        self.gremlin_api
            .as_ref()
            .context("No graph database URL configured, set `--gremlin-url` or `GREMLIN_URL`")
    }
}
