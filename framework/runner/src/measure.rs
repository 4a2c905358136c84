use analysis_probe_core::prelude::{CheckFailedError, DebugPayload, Measurement, MeasurementRun};
use anyhow::Context;
use chrono::Utc;
use indicatif::ProgressBar;
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Call `work` repeatedly, time each call and collect the results.
///
/// `work` is called exactly `measurement_count` times on the calling thread and receives the index
/// of the call. After each call the value it returned is passed to `check`:
/// - in single-threaded mode (`thread_id` is `None`) a value rejected by `check` stops the loop
///   with a [CheckFailedError],
/// - in threaded mode a rejected value is only logged and counted in
///   [MeasurementRun::failed_checks], so that one slow or failing worker does not hide the
///   timings of the others.
///
/// The loop sleeps for `pause` between calls. An error returned by `work` stops the loop and is
/// returned to the caller.
pub fn measure<T, W, C>(
    work: W,
    check: C,
    measurement_count: usize,
    pause: Duration,
    thread_id: Option<usize>,
) -> anyhow::Result<MeasurementRun>
where
    T: DebugPayload + Debug,
    W: FnMut(usize) -> anyhow::Result<T>,
    C: Fn(&T) -> bool,
{
    measure_with_progress(
        work,
        check,
        measurement_count,
        pause,
        thread_id,
        &ProgressBar::hidden(),
    )
}

/// Same as [measure] but advances `progress` by one for every completed call.
pub fn measure_with_progress<T, W, C>(
    mut work: W,
    check: C,
    measurement_count: usize,
    pause: Duration,
    thread_id: Option<usize>,
    progress: &ProgressBar,
) -> anyhow::Result<MeasurementRun>
where
    T: DebugPayload + Debug,
    W: FnMut(usize) -> anyhow::Result<T>,
    C: Fn(&T) -> bool,
{
    let mut run = MeasurementRun::new(thread_id);
    run.measurements.reserve(measurement_count);

    for i in 0..measurement_count {
        let started_at = Utc::now();
        let started = Instant::now();

        let retval = work(i)
            .with_context(|| format!("Call {}/{} failed", i + 1, measurement_count))?;

        let delta = started.elapsed();
        let finished_at = Utc::now();

        log::debug!("Return value: {retval:?}");

        if !check(&retval) {
            match thread_id {
                None => {
                    return Err(CheckFailedError::new(
                        i,
                        format!("unexpected return value {retval:?}"),
                    )
                    .into());
                }
                Some(thread_id) => {
                    log::warn!(
                        "thread: #{thread_id} call {}/{measurement_count} returned an unexpected value {retval:?}",
                        i + 1
                    );
                    run.failed_checks += 1;
                }
            }
        }

        measurement_log(thread_id, i, delta, measurement_count);

        run.measurements.push(Measurement {
            measurement_number: i,
            started_at,
            finished_at,
            delta,
        });

        if let Some(debug) = retval.debug_payload() {
            run.debug.push(debug);
        }

        progress.inc(1);

        if i + 1 < measurement_count && !pause.is_zero() {
            std::thread::sleep(pause);
        }
    }

    Ok(run)
}

fn measurement_log(thread_id: Option<usize>, i: usize, delta: Duration, measurement_count: usize) {
    match thread_id {
        Some(thread_id) => log::info!(
            "    thread: #{thread_id}    call {}/{measurement_count}    {delta:?}",
            i + 1
        ),
        None => log::info!("    #{}    {delta:?}", i + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_threaded_run_records_every_call_in_order() {
        let run = measure(|_| Ok(200u16), |r| *r == 200, 3, Duration::ZERO, None).unwrap();

        assert_eq!(3, run.measurements.len());
        assert_eq!(None, run.thread_id);
        for (expected, measurement) in run.measurements.iter().enumerate() {
            assert_eq!(expected, measurement.measurement_number);
            assert!(measurement.finished_at >= measurement.started_at);
        }
        assert!(run.debug.is_empty());
    }

    #[test]
    fn work_receives_call_index() {
        let mut seen = Vec::new();
        measure(
            |i| {
                seen.push(i);
                Ok(())
            },
            |_| true,
            4,
            Duration::ZERO,
            None,
        )
        .unwrap();

        assert_eq!(vec![0, 1, 2, 3], seen);
    }

    #[test]
    fn single_threaded_check_failure_stops_the_loop() {
        let mut calls = 0;
        let err = measure(
            |_| {
                calls += 1;
                Ok(if calls == 2 { 500u16 } else { 200u16 })
            },
            |r| *r == 200,
            5,
            Duration::ZERO,
            None,
        )
        .unwrap_err();

        let check_err = err.downcast_ref::<CheckFailedError>().unwrap();
        assert_eq!(1, check_err.measurement_number());
        assert_eq!(2, calls);
    }

    #[test]
    fn threaded_check_failure_is_counted_not_fatal() {
        let run = measure(|i| Ok(i % 2 == 0), |ok| *ok, 4, Duration::ZERO, Some(7)).unwrap();

        assert_eq!(Some(7), run.thread_id);
        assert_eq!(4, run.measurements.len());
        assert_eq!(2, run.failed_checks);
    }

    #[test]
    fn work_error_is_propagated() {
        let err = measure(
            |i| {
                if i == 1 {
                    anyhow::bail!("connection refused")
                }
                Ok(true)
            },
            |_| true,
            3,
            Duration::ZERO,
            None,
        )
        .unwrap_err();

        assert_eq!("Call 2/3 failed", err.to_string());
        assert_eq!("connection refused", err.root_cause().to_string());
    }

    #[test]
    fn debug_payloads_are_collected() {
        let run = measure(
            |i| {
                Ok(if i == 1 {
                    serde_json::json!({"result": 200, "debug": {"worker": "w-1"}})
                } else {
                    serde_json::json!({"result": 200})
                })
            },
            |_| true,
            3,
            Duration::ZERO,
            None,
        )
        .unwrap();

        assert_eq!(vec![serde_json::json!({"worker": "w-1"})], run.debug);
    }

    #[test]
    fn progress_advances_per_call() {
        let progress = ProgressBar::hidden();
        progress.set_length(3);
        measure_with_progress(|_| Ok(()), |_| true, 3, Duration::ZERO, None, &progress).unwrap();

        assert_eq!(3, progress.position());
    }
}
