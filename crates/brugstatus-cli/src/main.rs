mod output;

use anyhow::Context;
use brugstatus_core::config::Config;
use brugstatus_core::fetch::PortalClient;
use brugstatus_core::interpret::{interpret, Pipeline};
use brugstatus_core::strategy::default_strategies;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "brugstatus",
    about = "Check whether a bridge is currently open or closed, from Rotterdam open data",
    version
)]
struct Cli {
    /// Bridge name to query on the portal (default: Hogebrug)
    #[arg(long)]
    bridge: Option<String>,

    /// Dataset id on the open data portal (default: brugopeningen)
    #[arg(long)]
    dataset: Option<String>,

    /// Number of records to fetch for interpretation (default: 5)
    #[arg(long)]
    rows: Option<u32>,

    /// API endpoint override
    #[arg(long)]
    url: Option<String>,

    /// YAML config file with portal settings and keyword tables
    #[arg(long, env = "BRUGSTATUS_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, short = 'j')]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    // Flags override the config file, which overrides the built-in defaults.
    if let Some(bridge) = cli.bridge {
        config.portal.bridge = bridge;
    }
    if let Some(dataset) = cli.dataset {
        config.portal.dataset = dataset;
    }
    if let Some(rows) = cli.rows {
        config.portal.rows = rows;
    }
    if let Some(url) = cli.url {
        config.portal.base_url = url;
    }

    let client = PortalClient::new(config.portal).context("failed to build portal client")?;
    let fetched = client.fetch().context("failed to fetch records")?;
    tracing::debug!(records = fetched.records.len(), "fetched portal records");

    let pipeline = Pipeline::new(default_strategies());
    let result = interpret(&fetched.records, &pipeline, &config.strategy, &fetched.query);

    if cli.json {
        output::print_json(&result)?;
    } else {
        output::print_text(&result);
    }
    Ok(())
}
