use crate::context::StepContext;
use crate::error::StepError;
use crate::StepResult;
use std::time::Instant;

fn is_service_running(ctx: &StepContext) -> bool {
    match ctx.core_api.readiness() {
        Ok(response) => response.status == 200,
        Err(e) => {
            log::debug!("Core API is not reachable: {e:?}");
            false
        }
    }
}

/// Wait for the component search REST API to be available.
pub fn running_component_search_api(ctx: &mut StepContext) -> StepResult {
    if is_service_running(ctx) {
        return Ok(());
    }

    let budget = ctx.settings.service_wait_timeout;
    let started = Instant::now();
    log::info!(
        "Waiting up to {budget:?} for the core API at {} to be ready",
        ctx.core_api.base_url()
    );

    while started.elapsed() < budget {
        std::thread::sleep(ctx.settings.poll_interval);
        if is_service_running(ctx) {
            return Ok(());
        }
    }

    Err(StepError::Timeout {
        what: "the component search service".to_string(),
        waited: started.elapsed(),
    }
    .into())
}
