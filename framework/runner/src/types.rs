/// Recommended error type for benchmark drivers and the work functions passed to
/// [crate::prelude::measure].
pub type ProbeResult<T> = anyhow::Result<T>;
