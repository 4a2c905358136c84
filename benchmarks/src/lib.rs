mod benchmarks;
mod clients;
mod driver;
mod threads;

pub mod prelude {
    pub use crate::benchmarks::{
        component_analysis_benchmark, component_analysis_flow_scheduling, core_api_benchmark,
        jobs_api_benchmark, package_query_to_graph_db, package_version_query_to_graph_db,
        stack_analysis_benchmark, stack_manifest, BenchmarkParams, ComponentRef,
        KNOWN_COMPONENT, UNKNOWN_COMPONENT,
    };
    pub use crate::clients::{ApiEndpoints, Clients};
    pub use crate::driver::{run_benchmark, Benchmark};
    pub use crate::threads::{
        component_analysis_read_thread_known_component,
        component_analysis_read_thread_unknown_component, component_analysis_thread,
        core_api_benchmark_thread, jobs_api_benchmark_thread,
        package_query_graph_db_thread, package_version_query_graph_db_thread, stack_analysis_thread,
    };
}
