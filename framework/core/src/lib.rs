mod check;
mod measurement;
mod shutdown;

pub mod prelude {
    pub use crate::check::CheckFailedError;
    pub use crate::measurement::{DebugPayload, Measurement, MeasurementRun};
    pub use crate::shutdown::{StopHandle, StopListener};
}
