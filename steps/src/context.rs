use crate::error::StepError;
use analysis_api_client_instrumented::prelude::{ApiResponse, CoreApi};
use std::time::Duration;

/// Timing settings for the steps that wait on the service.
#[derive(Debug, Clone)]
pub struct StepSettings {
    /// Upper bound for waiting on a component analysis to finish.
    pub component_analysis_timeout: Duration,
    /// Pause between two polls of the same endpoint.
    pub poll_interval: Duration,
    /// Upper bound for waiting on the service to become ready.
    pub service_wait_timeout: Duration,
}

impl Default for StepSettings {
    fn default() -> Self {
        Self {
            component_analysis_timeout: Duration::from_secs(600),
            poll_interval: Duration::from_secs(10),
            service_wait_timeout: Duration::from_secs(60),
        }
    }
}

/// State shared by the steps of one scenario.
///
/// A new context is created for every scenario, so nothing carries over between scenarios.
pub struct StepContext {
    pub core_api: CoreApi,
    pub settings: StepSettings,
    /// The last response stored by a request step.
    pub response: Option<ApiResponse>,
    /// Wall-clock duration of the last component analysis read, in seconds.
    ///
    /// Measured between two wall-clock readings, so it can be zero or negative if the clock is
    /// adjusted during the call.
    pub duration: Option<f64>,
}

impl StepContext {
    pub fn new(core_api: CoreApi, settings: StepSettings) -> Self {
        Self {
            core_api,
            settings,
            response: None,
            duration: None,
        }
    }

    pub fn response(&self) -> Result<&ApiResponse, StepError> {
        self.response.as_ref().ok_or(StepError::NoResponse)
    }

    /// The stored response decoded as JSON.
    pub fn response_json(&self) -> anyhow::Result<serde_json::Value> {
        self.response()?.json()
    }
}
