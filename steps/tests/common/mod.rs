#![allow(dead_code)]

use analysis_api_client_instrumented::prelude::{AccessToken, CoreApi, ScriptedTransport, Url};
use analysis_steps::prelude::{StepContext, StepSettings};
use std::sync::Arc;
use std::time::Duration;

/// Settings with polling fast enough for tests: five polls one millisecond apart.
pub fn fast_settings() -> StepSettings {
    StepSettings {
        component_analysis_timeout: Duration::from_millis(5),
        poll_interval: Duration::from_millis(1),
        service_wait_timeout: Duration::from_millis(5),
    }
}

pub fn context(transport: Arc<ScriptedTransport>) -> StepContext {
    let core_api = CoreApi::new(Url::parse("http://core.test/").unwrap(), transport)
        .with_access_token(Some(AccessToken::new("t0k")));

    StepContext::new(core_api, fast_settings())
}

/// A context whose stored response is `body` with status 200.
pub fn context_with_response(body: serde_json::Value) -> StepContext {
    let mut ctx = context(Arc::new(ScriptedTransport::new()));
    ctx.response = Some(analysis_api_client_instrumented::prelude::ApiResponse::new(
        200,
        body.to_string(),
    ));
    ctx
}
