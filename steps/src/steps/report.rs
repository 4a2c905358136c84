use crate::attribute_checks::{
    check_array, check_attribute_presence, check_cve_value, check_first_value, score_text,
};
use crate::context::StepContext;
use crate::error::StepError;
use crate::json_utils::get_value_using_path;
use crate::StepResult;
use serde_json::Value;

fn recommendation(json: &Value) -> Result<&Value, StepError> {
    let result = check_attribute_presence(json, "result")?;
    check_attribute_presence(result, "recommendation")
}

fn first_analysis_item<'a>(json: &'a Value, item: &str) -> Result<&'a Value, StepError> {
    let path = format!("result/data/0/{item}");
    get_value_using_path(json, &path).ok_or_else(|| StepError::missing(path))
}

/// Check that the component analysis contains no recommendation.
pub fn check_analyzed_no_recommendation(ctx: &mut StepContext) -> StepResult {
    let json = ctx.response_json()?;
    let recommendation = recommendation(&json)?;

    let is_empty = recommendation.as_object().is_some_and(|r| r.is_empty());
    if !is_empty {
        return Err(StepError::Assertion(format!(
            "No recommendations are expected to be found in component analysis, found {recommendation}"
        ))
        .into());
    }

    Ok(())
}

/// Check that the component analysis recommends changing to `version`.
pub fn check_analyzed_recommendation_version(
    ctx: &mut StepContext,
    version: &str,
) -> StepResult {
    let json = ctx.response_json()?;
    let change_to = check_attribute_presence(recommendation(&json)?, "change_to")?;

    if change_to.as_str() != Some(version) {
        return Err(StepError::mismatch("Recommended version", version, change_to).into());
    }

    Ok(())
}

/// Check that the component analysis reports the CVE `cve` with the score `score`.
///
/// Every CVE before the matching one must carry a well formed id and a score.
pub fn check_analyzed_cve(ctx: &mut StepContext, cve: &str, score: &str) -> StepResult {
    let json = ctx.response_json()?;
    let component_analyses =
        check_attribute_presence(recommendation(&json)?, "component-analyses")?;
    let cves = check_array(check_attribute_presence(component_analyses, "cve")?, "cve")?;

    if cves.is_empty() {
        return Err(StepError::Assertion(
            "At least one CVE is expected in the component analysis".to_string(),
        )
        .into());
    }

    for entry in cves {
        let id = check_cve_value(check_attribute_presence(entry, "id")?)?;
        let cvss = check_attribute_presence(entry, "cvss")?;
        if id == cve && score_text(cvss) == score {
            return Ok(());
        }
    }

    Err(StepError::Assertion(format!("Can not find CVE {cve} with score {score}")).into())
}

/// Check the number of analyzed packages in the component analysis.
pub fn check_analyzed_packages_count(ctx: &mut StepContext, num: usize) -> StepResult {
    let json = ctx.response_json()?;
    let result = check_attribute_presence(&json, "result")?;
    let data = check_array(check_attribute_presence(result, "data")?, "data")?;

    if data.len() != num {
        return Err(StepError::mismatch("Number of analyzed packages", num, data.len()).into());
    }

    Ok(())
}

/// Check the package of the first analyzed item.
pub fn check_analyzed_packages(
    ctx: &mut StepContext,
    package: &str,
    ecosystem: &str,
) -> StepResult {
    let json = ctx.response_json()?;
    let package_data = first_analysis_item(&json, "package")?;

    let found = check_first_value(package_data, "ecosystem")?;
    if found != ecosystem {
        return Err(StepError::mismatch("Package ecosystem", ecosystem, found).into());
    }

    let found = check_first_value(package_data, "name")?;
    if found != package {
        return Err(StepError::mismatch("Package name", package, found).into());
    }

    Ok(())
}

/// Check the component version of the first analyzed item.
pub fn check_analyzed_component(
    ctx: &mut StepContext,
    package: &str,
    version: &str,
    ecosystem: &str,
) -> StepResult {
    let json = ctx.response_json()?;
    let version_data = first_analysis_item(&json, "version")?;

    let expected_values = [
        ("pecosystem", ecosystem),
        ("pname", package),
        ("version", version),
    ];
    for (attribute, expected) in expected_values {
        let found = check_first_value(version_data, attribute)?;
        if found != expected {
            return Err(
                StepError::mismatch(format!("Component '{attribute}'"), expected, found).into(),
            );
        }
    }

    Ok(())
}
