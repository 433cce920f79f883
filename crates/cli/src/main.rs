mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use prometheus::Registry;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cultureconv_core::{
    load_config, load_config_or_default,
    metrics::{encode_metrics, register_metrics},
    validate_config, BatchSource, Config, ConversionPipeline, CultureLoader,
    DirectoryCultureLoader, LineSink, StreamSource, DEFAULT_CONFIG_PATH,
};

use cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        // The subscriber may not be installed yet.
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = read_config(cli.config.as_deref())?;
    if let Some(data) = &cli.data {
        config.data.directory = Some(data.clone());
    }
    if cli.fail_fast {
        config.pipeline.halt_on_error = true;
    }

    init_logging(&config, cli.verbose)?;
    validate_config(&config).context("Configuration validation failed")?;

    let loader: Arc<dyn CultureLoader> = match &config.data.directory {
        Some(dir) => {
            info!("Loading cultures from {:?}", dir);
            Arc::new(DirectoryCultureLoader::new(dir.clone()))
        }
        None => Arc::new(DirectoryCultureLoader::builtin_only()),
    };
    let sink = Arc::new(LineSink::stdout());
    let pipeline = ConversionPipeline::new(config.pipeline.clone(), loader, sink);

    let result = match cli.command {
        Command::Convert {
            culture,
            inputs,
            format,
        } => {
            let mut batch = BatchSource::new(culture, inputs);
            if let Some(format) = format {
                batch = batch.with_format(format);
            }
            batch.run(pipeline).await
        }
        Command::Pipe => {
            StreamSource::new(BufReader::new(tokio::io::stdin()))
                .run(pipeline)
                .await
        }
    };

    if cli.metrics {
        print_metrics()?;
    }

    let summary = result.context("Conversion run failed")?;
    info!(
        "Done: {} converted, {} failed, {} rejected",
        summary.converted, summary.failed, summary.rejected
    );
    Ok(())
}

/// An explicit path must exist; the default path is optional.
fn read_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            load_config_or_default(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))
        }
    }
}

fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&config.logging.filter)
                .with_context(|| format!("Invalid logging filter {:?}", config.logging.filter))?,
        }
    };

    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    Ok(())
}

fn print_metrics() -> Result<()> {
    let registry = Registry::new();
    register_metrics(&registry).context("Failed to register metrics")?;
    let text = encode_metrics(&registry).context("Failed to encode metrics")?;
    eprint!("{}", text);
    Ok(())
}
