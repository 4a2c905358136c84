use analysis_api_client_instrumented::prelude::{AccessToken, Url};
use analysis_benchmarks::prelude::*;
use analysis_probe_runner::prelude::{init, ReportConfig, RunOptions};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(version, about = "Measure the latency of the component analysis service APIs")]
struct Args {
    /// The benchmark to run.
    #[arg(value_enum)]
    benchmark: Benchmark,

    /// Number of worker threads. One thread runs the benchmark on the main thread and fails on
    /// the first unexpected result.
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Number of calls made by each thread.
    #[arg(long, default_value_t = 10)]
    measurements: usize,

    /// Pause between two calls of the same thread, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pause_ms: u64,

    #[arg(long, env = "CORE_API_URL")]
    core_api_url: Url,

    #[arg(long, env = "JOBS_API_URL")]
    jobs_api_url: Option<Url>,

    /// URL of the Gremlin HTTP endpoint of the graph database.
    #[arg(long, env = "GREMLIN_URL")]
    gremlin_url: Option<Url>,

    #[arg(long, env = "RECOMMENDER_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Timeout in seconds of a single HTTP request.
    #[arg(long, default_value_t = 30)]
    http_timeout: u64,

    /// Do not show a progress bar.
    #[arg(long)]
    no_progress: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = init();

    let reporter = Arc::new(ReportConfig::default().enable_summary().init());

    let endpoints = ApiEndpoints::new(args.core_api_url, Duration::from_secs(args.http_timeout))
        .with_jobs_api(args.jobs_api_url)
        .with_gremlin(args.gremlin_url)
        .with_access_token(args.token.filter(|t| !t.is_empty()).map(AccessToken::new))
        .with_reporter(reporter.clone());

    let options = RunOptions {
        name: args
            .benchmark
            .to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_else(|| format!("{:?}", args.benchmark)),
        thread_count: args.threads,
        measurement_count: args.measurements,
        pause: Duration::from_millis(args.pause_ms),
        no_progress: args.no_progress,
    };

    let report = run_benchmark(args.benchmark, Arc::new(endpoints), &options)?;
    reporter.finalize();

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} worker(s) of {} failed",
            report.failures().count(),
            report.outcomes.len(),
            report.name
        );
    }

    Ok(())
}
