use crate::benchmarks::{
    component_analysis_benchmark, component_analysis_flow_scheduling, core_api_benchmark,
    jobs_api_benchmark, package_query_to_graph_db, package_version_query_to_graph_db,
    stack_analysis_benchmark, BenchmarkParams, KNOWN_COMPONENT, UNKNOWN_COMPONENT,
};
use crate::clients::ApiEndpoints;
use crate::threads;
use analysis_probe_runner::prelude::{
    run, MeasurementRun, ProgressBar, RunOptions, RunReport, WorkerOutcome,
};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// The benchmarks the driver can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Benchmark {
    /// Readiness of the core API.
    CoreApi,
    /// Readiness of the jobs API.
    JobsApi,
    StackAnalysis,
    /// Read the analysis of a component the service knows.
    KnownComponent,
    /// Read the analysis of a component that does not exist.
    UnknownComponent,
    /// Schedule forced component analyses through the jobs API.
    FlowScheduling,
    PackageQuery,
    PackageVersionQuery,
}

impl Benchmark {
    fn run_single(
        self,
        endpoints: &ApiEndpoints,
        params: &BenchmarkParams,
        progress: &ProgressBar,
    ) -> anyhow::Result<MeasurementRun> {
        let clients = endpoints.connect()?;

        match self {
            Benchmark::CoreApi => core_api_benchmark(&clients.core_api, params, None, progress),
            Benchmark::JobsApi => jobs_api_benchmark(clients.jobs_api()?, params, None, progress),
            Benchmark::StackAnalysis => {
                stack_analysis_benchmark(&clients.core_api, params, None, progress)
            }
            Benchmark::KnownComponent => component_analysis_benchmark(
                &clients.core_api,
                &KNOWN_COMPONENT,
                true,
                params,
                None,
                progress,
            ),
            Benchmark::UnknownComponent => component_analysis_benchmark(
                &clients.core_api,
                &UNKNOWN_COMPONENT,
                false,
                params,
                None,
                progress,
            ),
            Benchmark::FlowScheduling => component_analysis_flow_scheduling(
                clients.jobs_api()?,
                &KNOWN_COMPONENT,
                params,
                None,
                progress,
            ),
            Benchmark::PackageQuery => package_query_to_graph_db(
                clients.gremlin_api()?,
                &KNOWN_COMPONENT,
                params,
                None,
                progress,
            ),
            Benchmark::PackageVersionQuery => package_version_query_to_graph_db(
                clients.gremlin_api()?,
                &KNOWN_COMPONENT,
                params,
                None,
                progress,
            ),
        }
    }

    fn thread_variant(
        self,
    ) -> fn(&ApiEndpoints, &BenchmarkParams, Sender<WorkerOutcome>, usize, &ProgressBar) {
        match self {
            Benchmark::CoreApi => threads::core_api_benchmark_thread,
            Benchmark::JobsApi => threads::jobs_api_benchmark_thread,
            Benchmark::StackAnalysis => threads::stack_analysis_thread,
            Benchmark::KnownComponent => threads::component_analysis_read_thread_known_component,
            Benchmark::UnknownComponent => {
                threads::component_analysis_read_thread_unknown_component
            }
            Benchmark::FlowScheduling => threads::component_analysis_thread,
            Benchmark::PackageQuery => threads::package_query_graph_db_thread,
            Benchmark::PackageVersionQuery => threads::package_version_query_graph_db_thread,
        }
    }
}

/// Run `benchmark` as described by `options`.
///
/// With a single thread the benchmark runs on the calling thread and every result is checked.
/// With more threads every worker runs the thread variant of the benchmark with its own clients.
pub fn run_benchmark(
    benchmark: Benchmark,
    endpoints: Arc<ApiEndpoints>,
    options: &RunOptions,
) -> anyhow::Result<RunReport> {
    let params = BenchmarkParams {
        measurement_count: options.measurement_count,
        pause: options.pause,
    };
    let thread_variant = benchmark.thread_variant();
    let worker_endpoints = endpoints.clone();

    run(
        options,
        |progress| benchmark.run_single(&endpoints, &params, progress),
        move |thread_id, sender, progress| {
            thread_variant(&worker_endpoints, &params, sender, thread_id, progress)
        },
    )
}
