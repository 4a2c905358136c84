//! Benchmarks run inside a worker thread. Each builds its own clients, runs one benchmark with
//! its thread id and sends the outcome back on the channel.

use crate::benchmarks::{
    component_analysis_benchmark, component_analysis_flow_scheduling, core_api_benchmark,
    jobs_api_benchmark, package_query_to_graph_db, package_version_query_to_graph_db,
    stack_analysis_benchmark, BenchmarkParams, KNOWN_COMPONENT, UNKNOWN_COMPONENT,
};
use crate::clients::{ApiEndpoints, Clients};
use analysis_probe_runner::prelude::{MeasurementRun, ProgressBar, WorkerOutcome};
use std::sync::mpsc::Sender;

fn run_in_thread(
    endpoints: &ApiEndpoints,
    sender: Sender<WorkerOutcome>,
    thread_id: usize,
    benchmark: impl FnOnce(&Clients) -> anyhow::Result<MeasurementRun>,
) {
    let result = endpoints
        .connect()
        .and_then(|clients| benchmark(&clients));

    if sender.send(WorkerOutcome { thread_id, result }).is_err() {
        log::error!("Worker {thread_id} could not deliver its results, the receiver is gone");
    }
}

pub fn core_api_benchmark_thread(
    endpoints: &ApiEndpoints,
    params: &BenchmarkParams,
    sender: Sender<WorkerOutcome>,
    thread_id: usize,
    progress: &ProgressBar,
) {
    run_in_thread(endpoints, sender, thread_id, |clients| {
        core_api_benchmark(&clients.core_api, params, Some(thread_id), progress)
    })
}

/// Same benchmark as single-threaded mode, with the thread id attached.
pub fn jobs_api_benchmark_thread(
    endpoints: &ApiEndpoints,
    params: &BenchmarkParams,
    sender: Sender<WorkerOutcome>,
    thread_id: usize,
    progress: &ProgressBar,
) {
    run_in_thread(endpoints, sender, thread_id, |clients| {
        jobs_api_benchmark(clients.jobs_api()?, params, Some(thread_id), progress)
    })
}

/// Read the analysis of a component the service knows.
pub fn component_analysis_read_thread_known_component(
    endpoints: &ApiEndpoints,
    params: &BenchmarkParams,
    sender: Sender<WorkerOutcome>,
    thread_id: usize,
    progress: &ProgressBar,
) {
    run_in_thread(endpoints, sender, thread_id, |clients| {
        component_analysis_benchmark(
            &clients.core_api,
            &KNOWN_COMPONENT,
            true,
            params,
            Some(thread_id),
            progress,
        )
    })
}

/// Read the analysis of a component that does not exist.
pub fn component_analysis_read_thread_unknown_component(
    endpoints: &ApiEndpoints,
    params: &BenchmarkParams,
    sender: Sender<WorkerOutcome>,
    thread_id: usize,
    progress: &ProgressBar,
) {
    run_in_thread(endpoints, sender, thread_id, |clients| {
        component_analysis_benchmark(
            &clients.core_api,
            &UNKNOWN_COMPONENT,
            false,
            params,
            Some(thread_id),
            progress,
        )
    })
}

pub fn component_analysis_thread(
    endpoints: &ApiEndpoints,
    params: &BenchmarkParams,
    sender: Sender<WorkerOutcome>,
    thread_id: usize,
    progress: &ProgressBar,
) {
    run_in_thread(endpoints, sender, thread_id, |clients| {
        component_analysis_flow_scheduling(
            clients.jobs_api()?,
            &KNOWN_COMPONENT,
            params,
            Some(thread_id),
            progress,
        )
    })
}

pub fn stack_analysis_thread(
    endpoints: &ApiEndpoints,
    params: &BenchmarkParams,
    sender: Sender<WorkerOutcome>,
    thread_id: usize,
    progress: &ProgressBar,
) {
    run_in_thread(endpoints, sender, thread_id, |clients| {
        stack_analysis_benchmark(&clients.core_api, params, Some(thread_id), progress)
    })
}

pub fn package_query_graph_db_thread(
    endpoints: &ApiEndpoints,
    params: &BenchmarkParams,
    sender: Sender<WorkerOutcome>,
    thread_id: usize,
    progress: &ProgressBar,
) {
    run_in_thread(endpoints, sender, thread_id, |clients| {
        package_query_to_graph_db(
            clients.gremlin_api()?,
            &KNOWN_COMPONENT,
            params,
            Some(thread_id),
            progress,
        )
    })
}

pub fn package_version_query_graph_db_thread(
    endpoints: &ApiEndpoints,
    params: &BenchmarkParams,
    sender: Sender<WorkerOutcome>,
    thread_id: usize,
    progress: &ProgressBar,
) {
    run_in_thread(endpoints, sender, thread_id, |clients| {
        package_version_query_to_graph_db(
            clients.gremlin_api()?,
            &KNOWN_COMPONENT,
            params,
            Some(thread_id),
            progress,
        )
    })
}
