use analysis_api_client_instrumented::prelude::{CoreApi, ReqwestTransport};
use analysis_probe_runner::prelude::init;
use analysis_steps::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(version, about = "Run component analysis feature files against a live service")]
struct Args {
    /// Feature files to run.
    #[arg(required_unless_present = "list_steps")]
    features: Vec<PathBuf>,

    /// TOML file with the harness settings. Command line values override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the core API.
    #[arg(long, env = "CORE_API_URL")]
    coreapi_url: Option<String>,

    /// Access token sent by the steps that ask for authorization.
    #[arg(long, env = "RECOMMENDER_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Seconds to wait for a component analysis to finish.
    #[arg(long, env = "COMPONENT_ANALYSIS_TIMEOUT")]
    component_analysis_timeout: Option<u64>,

    /// Seconds between two polls of the service.
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Timeout in seconds of a single HTTP request.
    #[arg(long)]
    http_timeout: Option<u64>,

    /// Print the registered step patterns and exit.
    #[arg(long)]
    list_steps: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = init();

    let registry = default_registry()?;

    if args.list_steps {
        for definition in registry.definitions() {
            println!("{} {}", definition.kind, definition.pattern);
        }
        return Ok(());
    }

    let file_config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    let config = file_config
        .merge(HarnessConfig {
            coreapi_url: args.coreapi_url,
            access_token: args.token,
            component_analysis_timeout_s: args.component_analysis_timeout,
            poll_interval_s: args.poll_interval,
            service_wait_timeout_s: None,
            http_timeout_s: args.http_timeout,
        })
        .resolve()?;

    log::info!("Running against core API at {}", config.coreapi_url);
    if config.access_token.is_none() {
        log::warn!("No access token configured, steps that need one will fail");
    }

    let transport = Arc::new(ReqwestTransport::new(config.http_timeout)?);
    let core_api = CoreApi::new(config.coreapi_url.clone(), transport)
        .with_access_token(config.access_token.clone());

    let features = args
        .features
        .iter()
        .map(|path| load_feature(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let outcomes = features
        .iter()
        .flat_map(|feature| {
            run_feature(&registry, feature, || {
                StepContext::new(core_api.clone(), config.step_settings.clone())
            })
        })
        .collect::<Vec<_>>();

    print_scenario_results(&outcomes);

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} scenario(s) did not pass", outcomes.len());
    }

    Ok(())
}
