use crate::attribute_checks::{check_array, check_attribute_presence, check_string_attribute};
use crate::context::StepContext;
use crate::error::StepError;
use crate::StepResult;
use serde_json::Value;

/// Search for a component and store the response. The response is not checked here.
pub fn search_for_component(
    ctx: &mut StepContext,
    component: &str,
    use_token: bool,
) -> StepResult {
    let response = ctx.core_api.component_search(component, use_token)?;
    log::debug!(
        "Search for component '{component}' returned status {}",
        response.status
    );
    ctx.response = Some(response);
    Ok(())
}

/// The `result` list of the stored component search response.
fn search_results(ctx: &StepContext) -> anyhow::Result<Vec<Value>> {
    let json = ctx.response_json()?;
    let results = check_attribute_presence(&json, "result")?;
    Ok(check_array(results, "result")?.clone())
}

/// Check that the search found exactly `num` components, all of them from `ecosystem` and with
/// names from `components`.
pub fn check_components(
    ctx: &mut StepContext,
    num: usize,
    components: &[String],
    ecosystem: &str,
) -> StepResult {
    let results = search_results(ctx)?;

    if results.len() != num {
        return Err(StepError::mismatch("Number of components found", num, results.len()).into());
    }

    for result in &results {
        let found_ecosystem = check_string_attribute(result, "ecosystem")?;
        if found_ecosystem != ecosystem {
            return Err(StepError::mismatch(
                "Ecosystem of a found component",
                ecosystem,
                found_ecosystem,
            )
            .into());
        }

        let name = check_string_attribute(result, "name")?;
        if !components.iter().any(|c| c == name) {
            return Err(StepError::Assertion(format!(
                "Component '{name}' is not one of the expected components {components:?}"
            ))
            .into());
        }
    }

    Ok(())
}

/// Check that a component with a matching name is found in a matching ecosystem.
///
/// Names and ecosystems match when they contain the given text, so `six` also matches `sixer`.
pub fn check_component_analysis_existence(
    ctx: &mut StepContext,
    component: &str,
    ecosystem: &str,
) -> StepResult {
    for result in search_results(ctx)? {
        let found_ecosystem = check_string_attribute(&result, "ecosystem")?;
        let name = check_string_attribute(&result, "name")?;
        if found_ecosystem.contains(ecosystem) && name.contains(component) {
            return Ok(());
        }
    }

    Err(StepError::Assertion(format!(
        "Component {component} for ecosystem {ecosystem} could not be found"
    ))
    .into())
}

/// Check that the exact component is not found in `ecosystem`.
pub fn check_component_analysis_nonexistence_in_ecosystem(
    ctx: &mut StepContext,
    component: &str,
    ecosystem: &str,
) -> StepResult {
    for result in search_results(ctx)? {
        if result.get("ecosystem").and_then(Value::as_str) == Some(ecosystem)
            && result.get("name").and_then(Value::as_str) == Some(component)
        {
            return Err(StepError::Assertion(format!(
                "Component {component} for ecosystem {ecosystem} was found"
            ))
            .into());
        }
    }

    Ok(())
}

/// Check that the exact component is not found in any ecosystem.
pub fn check_component_analysis_nonexistence_in_any_ecosystem(
    ctx: &mut StepContext,
    component: &str,
) -> StepResult {
    for result in search_results(ctx)? {
        if result.get("name").and_then(Value::as_str) == Some(component) {
            let ecosystem = result
                .get("ecosystem")
                .map(Value::to_string)
                .unwrap_or_else(|| "<unknown>".to_string());
            return Err(StepError::Assertion(format!(
                "Component {component} for ecosystem {ecosystem} was found"
            ))
            .into());
        }
    }

    Ok(())
}
