use crate::auth::{authorization, AccessToken};
use crate::instrument;
use crate::transport::{ApiResponse, HttpTransport};
use analysis_probe_instruments::Reporter;
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

const READINESS_PATH: &str = "api/v1/readiness";
const FLOW_SCHEDULING_PATH: &str = "api/v1/jobs/flow-scheduling";
const COMPONENT_ANALYSIS_FLOW: &str = "bayesianFlow";

#[derive(Debug, Serialize)]
struct FlowArguments<'a> {
    ecosystem: &'a str,
    name: &'a str,
    version: &'a str,
    force: bool,
}

#[derive(Debug, Serialize)]
struct FlowSchedulingRequest<'a> {
    flow_name: &'a str,
    flow_arguments: Vec<FlowArguments<'a>>,
}

/// Instrumented client for the jobs API, which schedules analysis flows directly on the workers.
#[derive(Clone)]
pub struct JobsApi {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    access_token: Option<AccessToken>,
    reporter: Option<Arc<Reporter>>,
}

impl JobsApi {
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

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Cannot join '{path}' onto {}", self.base_url))
    }

    /// GET the readiness endpoint of the jobs API.
    pub fn readiness(&self) -> anyhow::Result<ApiResponse> {
        instrument(self.reporter.as_deref(), "jobs_api.readiness", || {
            self.transport.get(&self.url(READINESS_PATH)?, &[])
        })
    }

    /// Schedule a forced component analysis flow. Returns whether the jobs API accepted the flow.
    pub fn schedule_component_analysis(
        &self,
        ecosystem: &str,
        component: &str,
        version: &str,
    ) -> anyhow::Result<bool> {
        instrument(self.reporter.as_deref(), "jobs_api.flow_scheduling", || {
            let request = FlowSchedulingRequest {
                flow_name: COMPONENT_ANALYSIS_FLOW,
                flow_arguments: vec![FlowArguments {
                    ecosystem,
                    name: component,
                    version,
                    force: true,
                }],
            };
            let body = serde_json::to_value(&request)?;
            let headers = authorization(
                self.access_token.as_ref(),
                self.access_token.is_some(),
                "flow scheduling",
            )?;

            let response = self
                .transport
                .post_json(&self.url(FLOW_SCHEDULING_PATH)?, &headers, &body)?;
            if !matches!(response.status, 200 | 201) {
                log::warn!(
                    "Flow scheduling for {ecosystem}/{component}/{version} was refused with status {}",
                    response.status
                );
            }

            Ok(matches!(response.status, 200 | 201))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedTransport;
    use pretty_assertions::assert_eq;

    #[test]
    fn schedules_forced_flow() {
        let transport = Arc::new(ScriptedTransport::new().with_response(201, "{}"));
        let api = JobsApi::new(Url::parse("http://jobs.test/").unwrap(), transport.clone());

        assert!(api
            .schedule_component_analysis("pypi", "clojure_py", "0.2.4")
            .unwrap());

        let request = &transport.requests()[0];
        assert_eq!("POST", request.method);
        assert_eq!(
            "http://jobs.test/api/v1/jobs/flow-scheduling",
            request.url.as_str()
        );
        assert_eq!(
            Some(serde_json::json!({
                "flow_name": "bayesianFlow",
                "flow_arguments": [
                    {"ecosystem": "pypi", "name": "clojure_py", "version": "0.2.4", "force": true}
                ]
            })),
            request.body
        );
    }

    #[test]
    fn refused_flow_is_not_scheduled() {
        let transport = Arc::new(ScriptedTransport::new().with_response(400, "{}"));
        let api = JobsApi::new(Url::parse("http://jobs.test/").unwrap(), transport);

        assert!(!api
            .schedule_component_analysis("pypi", "clojure_py", "0.2.4")
            .unwrap());
    }
}
