use crate::error::MissingAccessTokenError;
use crate::transport::Headers;

/// Bearer token sent to the APIs that require authorization.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

// Keep tokens out of logs.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Build the headers for a request, adding `Authorization: Bearer <token>` when `use_token` is
/// set.
pub fn authorization(
    token: Option<&AccessToken>,
    use_token: bool,
    operation: &str,
) -> Result<Headers, MissingAccessTokenError> {
    if !use_token {
        return Ok(Headers::new());
    }

    match token {
        Some(AccessToken(token)) => Ok(vec![(
            "Authorization".to_string(),
            format!("Bearer {token}"),
        )]),
        None => Err(MissingAccessTokenError::new(operation)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header_without_token_request() {
        let token = AccessToken::new("secret");

        assert!(authorization(Some(&token), false, "op").unwrap().is_empty());
        assert!(authorization(None, false, "op").unwrap().is_empty());
    }

    #[test]
    fn bearer_header_with_token() {
        let token = AccessToken::new("secret");

        let headers = authorization(Some(&token), true, "op").unwrap();
        assert_eq!(
            vec![("Authorization".to_string(), "Bearer secret".to_string())],
            headers
        );
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = authorization(None, true, "component_search").unwrap_err();

        assert!(err.to_string().contains("component_search"));
    }

    #[test]
    fn debug_output_hides_token() {
        assert_eq!("AccessToken(***)", format!("{:?}", AccessToken::new("secret")));
    }
}
