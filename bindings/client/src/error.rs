/// An operation was asked to send an authorization header but the client has no access token.
#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("An authorization token is required for {operation} but none is configured")]
pub struct MissingAccessTokenError {
    operation: String,
}

impl MissingAccessTokenError {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}
