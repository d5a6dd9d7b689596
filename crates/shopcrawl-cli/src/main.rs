use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shopcrawl_core::{load_app_config, validate_values, AppConfig};
use shopcrawl_scraper::output::write_products;
use shopcrawl_scraper::sources;
use shopcrawl_scraper::{HttpFetcher, Pipeline};

#[derive(Debug, Parser)]
#[command(name = "shopcrawl")]
#[command(about = "Storefront catalog scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape one source (or all registered sources), validate, and write
    /// one JSON file per source under the output directory.
    Scrape {
        /// Source name (foreignfortune, lechocolat, traderjoes). Omit to
        /// run every registered source.
        #[arg(long)]
        source: Option<String>,
    },
    /// Re-run the business-rule validation over a previously written
    /// output file.
    Validate {
        /// Path to a JSON array of product records.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_app_config().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scrape { source } => scrape(&config, source.as_deref()).await,
        Commands::Validate { file } => validate_file(&file),
    }
}

async fn scrape(config: &AppConfig, source_name: Option<&str>) -> anyhow::Result<()> {
    let selected = match source_name {
        Some(name) => vec![sources::by_name(name)
            .with_context(|| format!("unknown source \"{name}\""))?],
        None => sources::all(),
    };

    // One fetcher session per process run; each source's pipeline borrows
    // it but keeps its own pagination state.
    let fetcher = HttpFetcher::new(
        config.request_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_secs,
    )
    .context("failed to build HTTP fetcher")?;

    for source in selected {
        let pipeline = Pipeline::new(&fetcher, config);
        let products = pipeline.run(source.as_ref()).await;

        let errors = shopcrawl_core::validate_products(&products);
        for error in &errors {
            tracing::warn!(
                product_id = error.product_id.as_deref().unwrap_or("<unknown>"),
                field = %error.field,
                "validation: {}",
                error.error
            );
        }

        let path = write_products(&config.output_dir, source.name(), &products)
            .with_context(|| format!("failed to write output for {}", source.name()))?;
        tracing::info!(
            source = source.name(),
            products = products.len(),
            validation_errors = errors.len(),
            path = %path.display(),
            "run finished"
        );
    }

    Ok(())
}

fn validate_file(file: &std::path::Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let products: Vec<serde_json::Value> =
        serde_json::from_str(&content).with_context(|| format!("{} is not a JSON array", file.display()))?;

    let errors = validate_values(&products);
    for error in &errors {
        tracing::error!(
            product_id = error.product_id.as_deref().unwrap_or("<unknown>"),
            field = %error.field,
            "{}",
            error.error
        );
    }
    println!("Total validation errors: {}", errors.len());

    Ok(())
}
