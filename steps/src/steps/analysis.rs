use crate::context::StepContext;
use crate::error::StepError;
use crate::StepResult;
use chrono::Utc;

/// Start the analysis of a component.
///
/// The service answers a component analysis request with
/// - 200 OK: the analysis is already finished,
/// - 202 ACCEPTED: the analysis is not finished and might be planned,
/// - 400 BAD REQUEST: unknown ecosystem and similar,
/// - 401 UNAUTHORIZED: missing or improper authorization token,
/// - 404 NOT FOUND: the analysis is started or in progress.
///
/// A freshly started analysis must not be finished already, so 200 fails this step, as does any
/// status not listed above. The response is stored either way.
pub fn start_analysis_for_component(
    ctx: &mut StepContext,
    ecosystem: &str,
    component: &str,
    version: &str,
    use_token: bool,
) -> StepResult {
    let response = ctx
        .core_api
        .component_analysis(ecosystem, component, version, use_token)?;
    let status = response.status;
    ctx.response = Some(response);

    match status {
        200 => Err(StepError::AnalysisAlreadyFinished.into()),
        202 | 400 | 401 | 404 => Ok(()),
        actual => Err(StepError::UnexpectedStatus {
            expected: "202, 400, 401 or 404".to_string(),
            actual,
        }
        .into()),
    }
}

/// Read the component analysis, or the error returned instead of it, and record how long the call
/// took. Nothing is checked about the response itself.
pub fn read_analysis_for_component(
    ctx: &mut StepContext,
    ecosystem: &str,
    component: &str,
    version: &str,
    use_token: bool,
) -> StepResult {
    ctx.duration = None;
    let start_time = Utc::now();

    let response = ctx
        .core_api
        .component_analysis(ecosystem, component, version, use_token)?;

    let end_time = Utc::now();
    ctx.response = Some(response);
    // A clock adjustment between the two readings can make this zero or negative, which the
    // duration checks reject.
    let elapsed_micros = (end_time - start_time)
        .num_microseconds()
        .unwrap_or(i64::MAX);
    ctx.duration = Some(elapsed_micros as f64 / 1e6);

    Ok(())
}

/// Poll the component analysis until it is finished.
///
/// While the analysis is in progress the service answers 404. The analysis is polled once per
/// polling interval, at most `timeout / interval` times. Any status other than 200 or 404 fails
/// immediately.
pub fn finish_analysis_for_component(
    ctx: &mut StepContext,
    ecosystem: &str,
    component: &str,
    version: &str,
    use_token: bool,
) -> StepResult {
    let timeout = ctx.settings.component_analysis_timeout;
    let interval = ctx.settings.poll_interval;
    let polls = timeout
        .as_nanos()
        .checked_div(interval.as_nanos())
        .unwrap_or(0);

    for _ in 0..polls {
        let response = ctx
            .core_api
            .component_analysis(ecosystem, component, version, use_token)?;
        match response.status {
            200 => {
                ctx.response = Some(response);
                return Ok(());
            }
            404 => {
                log::debug!("Analysis of {ecosystem}/{component}/{version} is still in progress");
            }
            actual => {
                return Err(StepError::UnexpectedStatus {
                    expected: "200 or 404".to_string(),
                    actual,
                }
                .into());
            }
        }
        std::thread::sleep(interval);
    }

    Err(StepError::Timeout {
        what: format!("the component analysis results of {ecosystem}/{component}/{version}"),
        waited: timeout,
    }
    .into())
}

/// Check that there is a stored response with a JSON body.
pub fn look_at_recent_component_analysis(ctx: &mut StepContext) -> StepResult {
    ctx.response_json()?;
    Ok(())
}

/// Check that a duration has been recorded.
pub fn look_at_component_analysis_duration(ctx: &mut StepContext) -> StepResult {
    if ctx.duration.is_none() {
        return Err(StepError::Assertion(
            "No component analysis duration has been recorded".to_string(),
        )
        .into());
    }
    Ok(())
}

/// Check that the recorded duration is positive and below `threshold` seconds.
pub fn check_component_analysis_duration_in_seconds(
    ctx: &mut StepContext,
    threshold: u64,
) -> StepResult {
    let duration = ctx.duration.ok_or_else(|| {
        StepError::Assertion("No component analysis duration has been recorded".to_string())
    })?;

    // with very low probability, leap second might occur
    if duration <= 0.0 {
        return Err(StepError::Assertion(format!(
            "Duration is {duration} seconds, it means that the clock was adjusted during the component analysis"
        ))
        .into());
    }

    if duration >= threshold as f64 {
        return Err(StepError::Assertion(format!(
            "Component analysis duration is too long: {duration} seconds instead of less than {threshold}"
        ))
        .into());
    }

    Ok(())
}

/// Same as [check_component_analysis_duration_in_seconds] with the threshold in minutes.
pub fn check_component_analysis_duration_in_minutes(
    ctx: &mut StepContext,
    threshold: u64,
) -> StepResult {
    let seconds = threshold.checked_mul(60).ok_or_else(|| {
        StepError::Assertion(format!("Duration threshold of {threshold} minutes is too large"))
    })?;

    check_component_analysis_duration_in_seconds(ctx, seconds)
}
