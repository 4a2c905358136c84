/// Returned by a single-threaded measurement loop when the check function rejects the value
/// produced by a call.
///
/// The measurement loop stops at the first rejected value, so the measurements collected before it
/// are discarded along with the run.
#[derive(derive_more::Error, derive_more::Display, Debug)]
#[display("Check failed for call {measurement_number}: {msg}")]
pub struct CheckFailedError {
    measurement_number: usize,
    msg: String,
}

impl CheckFailedError {
    pub fn new(measurement_number: usize, msg: impl Into<String>) -> Self {
        Self {
            measurement_number,
            msg: msg.into(),
        }
    }

    pub fn measurement_number(&self) -> usize {
        self.measurement_number
    }
}
