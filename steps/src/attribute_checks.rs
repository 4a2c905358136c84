use crate::error::StepError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Return the attribute `attribute` of `data`, failing if it is not there.
pub fn check_attribute_presence<'a>(
    data: &'a Value,
    attribute: &str,
) -> Result<&'a Value, StepError> {
    data.get(attribute)
        .ok_or_else(|| StepError::missing(attribute))
}

/// Return `data` as an array, failing with a message naming `what` otherwise.
pub fn check_array<'a>(data: &'a Value, what: &str) -> Result<&'a Vec<Value>, StepError> {
    data.as_array()
        .ok_or_else(|| StepError::Assertion(format!("'{what}' is expected to be a list")))
}

/// Return the string attribute `attribute` of `data`.
pub fn check_string_attribute<'a>(data: &'a Value, attribute: &str) -> Result<&'a str, StepError> {
    check_attribute_presence(data, attribute)?
        .as_str()
        .ok_or_else(|| StepError::Assertion(format!("'{attribute}' is expected to be a string")))
}

/// Graph database properties are stored as lists of values. Return the first value of the
/// property `attribute`, accepting a plain string as well.
pub fn check_first_value<'a>(data: &'a Value, attribute: &str) -> Result<&'a str, StepError> {
    let value = check_attribute_presence(data, attribute)?;
    let first = match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    };

    first.and_then(Value::as_str).ok_or_else(|| {
        StepError::Assertion(format!(
            "'{attribute}' is expected to hold a string value, found {value}"
        ))
    })
}

fn cve_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^CVE-\d{4}-\d{4,}$").expect("CVE pattern is valid"))
}

/// Check that `value` is a well formed CVE identifier, for example `CVE-2017-1000246`.
pub fn check_cve_value(value: &Value) -> Result<&str, StepError> {
    let id = value.as_str().ok_or_else(|| {
        StepError::Assertion(format!("CVE id is expected to be a string, found {value}"))
    })?;

    if !cve_id_pattern().is_match(id) {
        return Err(StepError::Assertion(format!("Improper CVE id '{id}'")));
    }

    Ok(id)
}

/// Text of a CVSS score for comparison with the score written in a step. Numbers use their JSON
/// text, strings are taken as they are.
pub fn score_text(score: &Value) -> String {
    match score {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
