mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use probe_core::{
    load_config, validate_config, AssetDownloader, CatalogJob, Config, DailySetup,
    HttpAssetDownloader, HttpStatusClient, ObjectStore, ProbeError, ProductJob, S3ObjectStore,
    ScenarioRunner, StatusApi,
};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let invocation = uuid::Uuid::new_v4();
    let span = info_span!("probe", command = ?cli.command, %invocation);

    if let Err(e) = run(cli).instrument(span).await {
        match e.downcast_ref::<ProbeError>() {
            Some(probe) => error!(kind = ?probe.kind(), "{:#}", e),
            None => error!("{:#}", e),
        }
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Loading configuration from {:?}", cli.config);
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        "Buckets: input={}, test data={}",
        config.storage.bucket_name, config.storage.test_data_bucket_name
    );

    let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::from_config(&config.aws).await);
    let status_api: Arc<dyn StatusApi> = Arc::new(
        HttpStatusClient::new(&config.status_api).context("Failed to create status API client")?,
    );
    info!("Status API at {}", config.status_api.base_url);

    match cli.command {
        Commands::Setup => {
            let setup = DailySetup::new(&config, store, status_api)
                .with_on_complete(Arc::new(|catalog: &CatalogJob, product: &ProductJob| {
                    info!(
                        "Catalog job {} and product job {} complete; ready for scenario",
                        catalog.id, product.id
                    );
                }));
            let outcome = setup.run().await?;
            info!("Setup finished in state {}", outcome.state_name());
            print_result(&outcome, cli.json)?;
        }
        Commands::Scenario => {
            let runner = scenario_runner(&config, store, status_api)?;
            let report = runner.run().await?;
            print_result(&report, cli.json)?;
        }
        Commands::Watch => {
            let runner = scenario_runner(&config, store, status_api)?;
            let report = runner.watch().await?;
            print_result(&report, cli.json)?;
        }
    }

    Ok(())
}

fn scenario_runner(
    config: &Config,
    store: Arc<dyn ObjectStore>,
    status_api: Arc<dyn StatusApi>,
) -> Result<ScenarioRunner> {
    let downloader: Arc<dyn AssetDownloader> = Arc::new(
        HttpAssetDownloader::new(config.artifacts.download_timeout())
            .context("Failed to create asset downloader")?,
    );
    Ok(ScenarioRunner::new(config, store, status_api, downloader))
}

fn print_result<T: Serialize>(result: &T, json: bool) -> Result<()> {
    let rendered = if json {
        serde_json::to_string(result)?
    } else {
        serde_json::to_string_pretty(result)?
    };
    println!("{}", rendered);
    Ok(())
}
