mod auth;
mod core_api;
mod error;
mod gremlin_api;
mod jobs_api;
mod reqwest_transport;
#[cfg(any(test, feature = "test_utils"))]
mod scripted;
mod transport;

pub mod prelude {
    pub use crate::auth::{authorization, AccessToken};
    pub use crate::core_api::{CoreApi, COMPONENT_ANALYSES_PATH, COMPONENT_SEARCH_PATH};
    pub use crate::error::MissingAccessTokenError;
    pub use crate::gremlin_api::GremlinApi;
    pub use crate::jobs_api::JobsApi;
    pub use crate::reqwest_transport::ReqwestTransport;
    #[cfg(any(test, feature = "test_utils"))]
    pub use crate::scripted::{RecordedRequest, ScriptedTransport};
    pub use crate::transport::{ApiResponse, Headers, HttpTransport};

    // Re-exported so that users of the clients do not need to depend on these crates directly.
    pub use analysis_probe_instruments::Reporter;
    pub use url::Url;
}

use analysis_probe_instruments::{report_operation, OperationRecord, Reporter};

/// Run an API operation and report how long it took.
pub(crate) fn instrument<T>(
    reporter: Option<&Reporter>,
    operation_id: &str,
    operation: impl FnOnce() -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let record = OperationRecord::new(operation_id);
    let response = operation();
    report_operation(reporter, record, &response);
    response
}
