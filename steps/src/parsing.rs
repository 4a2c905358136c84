use crate::error::StepError;

/// Parse the `{token} authorization token` clause of a step. Only `with` and `without` are
/// accepted.
pub fn parse_token_clause(token: &str) -> Result<bool, StepError> {
    match token.trim() {
        "with" => Ok(true),
        "without" => Ok(false),
        other => Err(StepError::InvalidTokenClause(other.to_string())),
    }
}

/// Split a comma separated list, trimming the items and dropping empty ones.
pub fn split_comma_separated_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_clause() {
        assert!(parse_token_clause("with").unwrap());
        assert!(!parse_token_clause("without").unwrap());
        assert!(matches!(
            parse_token_clause("maybe"),
            Err(StepError::InvalidTokenClause(clause)) if clause == "maybe"
        ));
    }

    #[test]
    fn comma_separated_list() {
        assert_eq!(
            vec!["six", "sixer", "six.moves"],
            split_comma_separated_list("six, sixer,six.moves")
        );
        assert!(split_comma_separated_list("").is_empty());
        assert_eq!(vec!["a"], split_comma_separated_list(" , a ,"));
    }
}
