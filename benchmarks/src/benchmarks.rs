//! Benchmarks of single API operations, built on [measure_with_progress].

use analysis_api_client_instrumented::prelude::{CoreApi, GremlinApi, JobsApi};
use analysis_probe_runner::prelude::{
    measure_with_progress, MeasurementRun, ProbeResult, ProgressBar,
};
use serde_json::json;
use std::time::Duration;

/// How many calls a benchmark makes and how long it pauses between them.
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkParams {
    pub measurement_count: usize,
    pub pause: Duration,
}

/// An ecosystem/component/version triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentRef {
    pub ecosystem: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// A component the service is expected to have analysed already.
pub const KNOWN_COMPONENT: ComponentRef = ComponentRef {
    ecosystem: "pypi",
    name: "clojure_py",
    version: "0.2.4",
};

/// A component that does not exist in its ecosystem.
pub const UNKNOWN_COMPONENT: ComponentRef = ComponentRef {
    ecosystem: "pypi",
    name: "non_existing_component",
    version: "9.8.7",
};

/// Manifest submitted by the stack analysis benchmark. The origin tells calls from different
/// threads and iterations apart on the service side.
pub fn stack_manifest(thread_id: Option<usize>, call: usize) -> serde_json::Value {
    let origin = match thread_id {
        Some(thread_id) => format!("analysis-bench/thread-{thread_id}/call-{call}"),
        None => format!("analysis-bench/call-{call}"),
    };

    json!({
        "origin": origin,
        "ecosystem": "pypi",
        "manifest_file": "requirements.txt",
        "dependencies": [
            {"package": KNOWN_COMPONENT.name, "version": KNOWN_COMPONENT.version},
            {"package": "six", "version": "1.11.0"}
        ]
    })
}

/// Measure the core API by reading its readiness endpoint.
pub fn core_api_benchmark(
    core_api: &CoreApi,
    params: &BenchmarkParams,
    thread_id: Option<usize>,
    progress: &ProgressBar,
) -> ProbeResult<MeasurementRun> {
    measure_with_progress(
        |_| core_api.readiness(),
        |response| response.status == 200,
        params.measurement_count,
        params.pause,
        thread_id,
        progress,
    )
}

/// Measure the jobs API by reading its readiness endpoint.
pub fn jobs_api_benchmark(
    jobs_api: &JobsApi,
    params: &BenchmarkParams,
    thread_id: Option<usize>,
    progress: &ProgressBar,
) -> ProbeResult<MeasurementRun> {
    measure_with_progress(
        |_| jobs_api.readiness(),
        |response| response.status == 200,
        params.measurement_count,
        params.pause,
        thread_id,
        progress,
    )
}

/// Measure the server and worker modules by submitting stack analyses.
pub fn stack_analysis_benchmark(
    core_api: &CoreApi,
    params: &BenchmarkParams,
    thread_id: Option<usize>,
    progress: &ProgressBar,
) -> ProbeResult<MeasurementRun> {
    measure_with_progress(
        |call| core_api.stack_analysis(&stack_manifest(thread_id, call)),
        |response| response.status == 200,
        params.measurement_count,
        params.pause,
        thread_id,
        progress,
    )
}

/// Measure reading the analysis of `component`, which must answer 200 if `should_exist` and 404
/// otherwise.
pub fn component_analysis_benchmark(
    core_api: &CoreApi,
    component: &ComponentRef,
    should_exist: bool,
    params: &BenchmarkParams,
    thread_id: Option<usize>,
    progress: &ProgressBar,
) -> ProbeResult<MeasurementRun> {
    let expected_status = if should_exist { 200 } else { 404 };
    let use_token = core_api.has_access_token();

    measure_with_progress(
        |_| {
            core_api.component_analysis(
                component.ecosystem,
                component.name,
                component.version,
                use_token,
            )
        },
        |response| response.status == expected_status,
        params.measurement_count,
        params.pause,
        thread_id,
        progress,
    )
}

/// Measure the jobs and worker modules by scheduling forced analyses of `component`.
pub fn component_analysis_flow_scheduling(
    jobs_api: &JobsApi,
    component: &ComponentRef,
    params: &BenchmarkParams,
    thread_id: Option<usize>,
    progress: &ProgressBar,
) -> ProbeResult<MeasurementRun> {
    measure_with_progress(
        |_| {
            jobs_api.schedule_component_analysis(
                component.ecosystem,
                component.name,
                component.version,
            )
        },
        |scheduled| *scheduled,
        params.measurement_count,
        params.pause,
        thread_id,
        progress,
    )
}

/// Measure a package query to the graph database.
pub fn package_query_to_graph_db(
    gremlin_api: &GremlinApi,
    component: &ComponentRef,
    params: &BenchmarkParams,
    thread_id: Option<usize>,
    progress: &ProgressBar,
) -> ProbeResult<MeasurementRun> {
    measure_with_progress(
        |_| gremlin_api.package_query(component.ecosystem, component.name),
        GremlinApi::check_gremlin_response,
        params.measurement_count,
        params.pause,
        thread_id,
        progress,
    )
}

/// Measure a package and version query to the graph database.
pub fn package_version_query_to_graph_db(
    gremlin_api: &GremlinApi,
    component: &ComponentRef,
    params: &BenchmarkParams,
    thread_id: Option<usize>,
    progress: &ProgressBar,
) -> ProbeResult<MeasurementRun> {
    measure_with_progress(
        |_| {
            gremlin_api.package_version_query(
                component.ecosystem,
                component.name,
                component.version,
            )
        },
        GremlinApi::check_gremlin_response,
        params.measurement_count,
        params.pause,
        thread_id,
        progress,
    )
}
