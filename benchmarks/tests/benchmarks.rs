use analysis_api_client_instrumented::prelude::{AccessToken, ScriptedTransport, Url};
use analysis_benchmarks::prelude::*;
use analysis_probe_runner::prelude::{CheckFailedError, ProgressBar, ReportConfig, RunOptions};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

const PARAMS: BenchmarkParams = BenchmarkParams {
    measurement_count: 3,
    pause: Duration::ZERO,
};

fn endpoints(transport: Arc<ScriptedTransport>) -> ApiEndpoints {
    ApiEndpoints::new(Url::parse("http://core.test/").unwrap(), Duration::from_secs(1))
        .with_jobs_api(Some(Url::parse("http://jobs.test/").unwrap()))
        .with_gremlin(Some(Url::parse("http://gremlin.test:8182/").unwrap()))
        .with_transport(transport)
}

fn options(thread_count: usize) -> RunOptions {
    RunOptions {
        name: "test".to_string(),
        thread_count,
        measurement_count: 2,
        pause: Duration::ZERO,
        no_progress: true,
    }
}

#[test]
fn core_api_benchmark_measures_every_call() {
    let transport = Arc::new(ScriptedTransport::new().with_repeated(3, 200, "{}"));
    let clients = endpoints(transport.clone()).connect().unwrap();

    let run = core_api_benchmark(&clients.core_api, &PARAMS, None, &ProgressBar::hidden()).unwrap();

    assert_eq!(3, run.len());
    assert_eq!(
        vec![0, 1, 2],
        run.measurements
            .iter()
            .map(|m| m.measurement_number)
            .collect::<Vec<_>>()
    );
    assert!(run.measurements.iter().all(|m| m.finished_at >= m.started_at));
    assert_eq!(
        "http://core.test/api/v1/readiness",
        transport.requests()[0].url.as_str()
    );
}

#[test]
fn single_threaded_benchmark_stops_on_failed_check() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_response(200, "{}")
            .with_response(503, "")
            .with_response(200, "{}"),
    );
    let clients = endpoints(transport.clone()).connect().unwrap();

    let err = core_api_benchmark(&clients.core_api, &PARAMS, None, &ProgressBar::hidden())
        .unwrap_err();

    let check_failed = err.downcast_ref::<CheckFailedError>().unwrap();
    assert_eq!(1, check_failed.measurement_number());
    assert_eq!(1, transport.remaining());
}

#[test]
fn threaded_benchmark_counts_failed_checks() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_response(200, "{}")
            .with_response(503, "")
            .with_response(200, "{}"),
    );
    let clients = endpoints(transport).connect().unwrap();

    let run = core_api_benchmark(&clients.core_api, &PARAMS, Some(4), &ProgressBar::hidden())
        .unwrap();

    assert_eq!(3, run.len());
    assert_eq!(1, run.failed_checks);
    assert_eq!(Some(4), run.thread_id);
}

#[test]
fn component_analysis_expects_404_for_unknown_component() {
    let transport = Arc::new(ScriptedTransport::new().with_repeated(3, 404, "{}"));
    let clients = endpoints(transport.clone()).connect().unwrap();

    component_analysis_benchmark(
        &clients.core_api,
        &UNKNOWN_COMPONENT,
        false,
        &PARAMS,
        None,
        &ProgressBar::hidden(),
    )
    .unwrap();

    assert_eq!(
        "http://core.test/api/v1/component-analyses/pypi/non_existing_component/9.8.7",
        transport.requests()[0].url.as_str()
    );

    let transport = Arc::new(ScriptedTransport::new().with_repeated(3, 404, "{}"));
    let clients = endpoints(transport).connect().unwrap();
    component_analysis_benchmark(
        &clients.core_api,
        &KNOWN_COMPONENT,
        true,
        &PARAMS,
        None,
        &ProgressBar::hidden(),
    )
    .unwrap_err();
}

#[test]
fn component_analysis_sends_configured_token() {
    let transport = Arc::new(ScriptedTransport::new().with_repeated(3, 200, "{}"));
    let clients = endpoints(transport.clone())
        .with_access_token(Some(AccessToken::new("t0k")))
        .connect()
        .unwrap();

    component_analysis_benchmark(
        &clients.core_api,
        &KNOWN_COMPONENT,
        true,
        &PARAMS,
        None,
        &ProgressBar::hidden(),
    )
    .unwrap();

    assert_eq!(Some("Bearer t0k"), transport.requests()[2].header("Authorization"));
}

#[test]
fn stack_analysis_collects_debug_payloads() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_response(200, r#"{"debug": {"worker": "a"}}"#)
            .with_response(200, "{}")
            .with_response(200, r#"{"debug": {"worker": "b"}}"#),
    );
    let clients = endpoints(transport.clone()).connect().unwrap();

    let run =
        stack_analysis_benchmark(&clients.core_api, &PARAMS, Some(2), &ProgressBar::hidden())
            .unwrap();

    assert_eq!(
        vec![
            serde_json::json!({"worker": "a"}),
            serde_json::json!({"worker": "b"})
        ],
        run.debug
    );
    let request = &transport.requests()[1];
    assert_eq!("POST", request.method);
    assert_eq!("http://core.test/api/v1/stack-analyses", request.url.as_str());
    assert_eq!(Some(stack_manifest(Some(2), 1)), request.body);
}

#[test]
fn flow_scheduling_checks_acceptance() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_response(201, "{}")
            .with_response(200, "{}")
            .with_response(500, "{}"),
    );
    let clients = endpoints(transport.clone()).connect().unwrap();

    let run = component_analysis_flow_scheduling(
        clients.jobs_api().unwrap(),
        &KNOWN_COMPONENT,
        &PARAMS,
        Some(1),
        &ProgressBar::hidden(),
    )
    .unwrap();

    assert_eq!(1, run.failed_checks);
    assert_eq!(
        "http://jobs.test/api/v1/jobs/flow-scheduling",
        transport.requests()[0].url.as_str()
    );
}

#[test]
fn graph_queries_use_gremlin_status() {
    let ok = r#"{"status": {"code": 200}, "result": {"data": []}}"#;
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_repeated(3, 200, ok)
            .with_repeated(2, 200, ok)
            .with_response(200, r#"{"status": {"code": 500}}"#),
    );
    let clients = endpoints(transport.clone()).connect().unwrap();
    let gremlin = clients.gremlin_api().unwrap();

    let progress = ProgressBar::hidden();
    package_query_to_graph_db(gremlin, &KNOWN_COMPONENT, &PARAMS, None, &progress).unwrap();
    package_version_query_to_graph_db(gremlin, &KNOWN_COMPONENT, &PARAMS, None, &progress)
        .unwrap_err();

    assert_eq!("http://gremlin.test:8182/", transport.requests()[0].url.as_str());
}

#[test]
fn missing_endpoints_fail_the_benchmark() {
    let transport = Arc::new(ScriptedTransport::new());
    let core_url = Url::parse("http://core.test/").unwrap();
    let clients = ApiEndpoints::new(core_url, Duration::from_secs(1))
        .with_transport(transport)
        .connect()
        .unwrap();

    assert!(clients.jobs_api().is_err());
    assert!(clients.gremlin_api().is_err());
}

#[test]
fn threaded_run_collects_one_outcome_per_worker() {
    let transport = Arc::new(ScriptedTransport::new().with_repeated(6, 200, "{}"));
    let reporter = Arc::new(ReportConfig::default().enable_summary().init());
    let endpoints = endpoints(transport.clone()).with_reporter(reporter.clone());

    let report = run_benchmark(Benchmark::CoreApi, Arc::new(endpoints), &options(3)).unwrap();

    assert!(report.is_success());
    let thread_ids = report.runs().iter().map(|r| r.thread_id).collect::<Vec<_>>();
    assert_eq!(vec![Some(1), Some(2), Some(3)], thread_ids);
    assert!(report.runs().iter().all(|r| r.len() == 2));
    assert_eq!(0, transport.remaining());

    let rows = reporter.summary_rows();
    assert_eq!(1, rows.len());
    assert_eq!("core_api.readiness", rows[0].operation_id);
    assert_eq!(6, rows[0].total_operations);
}

#[test]
fn single_thread_run_reports_failure() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .with_response(200, "{}")
            .with_response(404, "{}"),
    );

    let report = run_benchmark(
        Benchmark::KnownComponent,
        Arc::new(endpoints(transport)),
        &options(1),
    )
    .unwrap();

    assert!(!report.is_success());
    assert_eq!(1, report.failures().count());
}

#[test]
fn threaded_run_without_jobs_api_fails_every_worker() {
    let transport = Arc::new(ScriptedTransport::new());
    let core_url = Url::parse("http://core.test/").unwrap();
    let endpoints = ApiEndpoints::new(core_url, Duration::from_secs(1))
        .with_transport(transport);

    let report =
        run_benchmark(Benchmark::FlowScheduling, Arc::new(endpoints), &options(2)).unwrap();

    assert_eq!(2, report.failures().count());
}

#[test]
fn jobs_api_thread_sends_its_run_tagged_with_thread_id() {
    let transport = Arc::new(ScriptedTransport::new().with_repeated(3, 200, "{}"));
    let endpoints = endpoints(transport.clone());
    let (sender, receiver) = std::sync::mpsc::channel();

    jobs_api_benchmark_thread(&endpoints, &PARAMS, sender, 7, &ProgressBar::hidden());

    let outcome = receiver.recv().unwrap();
    assert_eq!(7, outcome.thread_id);
    let run = outcome.result.unwrap();
    assert_eq!(Some(7), run.thread_id);
    assert_eq!(3, run.len());
    assert_eq!(
        "http://jobs.test/api/v1/readiness",
        transport.requests()[0].url.as_str()
    );
}
