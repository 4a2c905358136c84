use std::time::Duration;

/// Why a step failed.
///
/// Step functions return [crate::StepResult], which wraps these errors in `anyhow`. Use
/// `err.downcast_ref::<StepError>()` to tell the failure kinds apart.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// The service answered with a status code outside of the documented set.
    #[error("Improper response: expected HTTP status code {expected}, received {actual}")]
    UnexpectedStatus { expected: String, actual: u16 },

    /// An analysis that was expected to be new had already been finished.
    #[error("Bad state: the analysis for component has been finished already")]
    AnalysisAlreadyFinished,

    /// A polling step ran out of its time budget before reaching the expected state.
    #[error("Timeout waiting for {what} after {waited:?}")]
    Timeout { what: String, waited: Duration },

    #[error("'{attribute}' attribute is expected in the data")]
    MissingAttribute { attribute: String },

    #[error("{what}: expected {expected}, found {actual}")]
    Mismatch {
        what: String,
        expected: String,
        actual: String,
    },

    #[error("{0}")]
    Assertion(String),

    #[error("No response has been stored by a previous step")]
    NoResponse,

    #[error("Invalid authorization token clause '{0}', expected 'with' or 'without'")]
    InvalidTokenClause(String),
}

impl StepError {
    pub fn missing(attribute: impl Into<String>) -> Self {
        StepError::MissingAttribute {
            attribute: attribute.into(),
        }
    }

    pub fn mismatch(
        what: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        StepError::Mismatch {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
