//! Carbon intensity dashboard entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use carbon_dashboard::aggregate::{average_intensity, format_average};
use carbon_dashboard::api;
use carbon_dashboard::config::Config;
use carbon_dashboard::intensity::{ElectricityMapsClient, HistorySource};

/// Carbon intensity dashboard.
#[derive(Parser, Debug)]
#[command(name = "carbon-dashboard")]
#[command(about = "Serve GB carbon intensity from the Electricity Maps API as HTML, JSON and CSV")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Fetch the history once and print a summary.
    Fetch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Configuration drives logging, so load it first and report errors after
    let loaded = Config::load();
    init_logging(loaded.as_ref().ok(), args.verbose);

    match args.command {
        Some(Command::Serve { port }) => cmd_serve(loaded, port.or(args.port)).await,
        Some(Command::CheckConfig) => cmd_check_config(loaded),
        Some(Command::Fetch) => cmd_fetch(loaded).await,
        None => cmd_serve(loaded, args.port).await,
    }
}

/// Install the tracing subscriber from configuration, falling back to
/// `info` text logs when configuration failed to load.
fn init_logging(config: Option<&Config>, verbose: bool) {
    let fallback = Config::default();
    let config = config.unwrap_or(&fallback);

    let filter =
        EnvFilter::try_new(config.log_directive(verbose)).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = config.log_json;

    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .with(filter)
        .init();
}

/// Validate loaded configuration, logging failures.
fn load_config(loaded: Result<Config, envy::Error>) -> anyhow::Result<Config> {
    let config = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config(loaded: Result<Config, envy::Error>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("CARBON DASHBOARD - CONFIGURATION CHECK");
    println!("======================================================================");

    let config = load_config(loaded)?;

    println!("  API URL: {}", config.electricity_maps_api_url);
    if config.has_token() {
        println!("  API Token: {}", config.masked_token());
    } else {
        println!("  WARNING: ELECTRICITY_MAPS_API_TOKEN is not set; requests will be unauthenticated");
    }
    println!("  Listen: {}:{}", config.bind_address, config.port);
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("  Log Filter: {}", config.rust_log);
    println!("  Log Format: {}", if config.log_json { "JSON" } else { "Text" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Fetch the history once and print a summary.
async fn cmd_fetch(loaded: Result<Config, envy::Error>) -> anyhow::Result<()> {
    let config = load_config(loaded)?;
    let client = ElectricityMapsClient::new(&config)?;

    println!("Fetching {} ...", client.api_url());
    let readings = client.fetch().await?;
    let average = average_intensity(&readings)?;

    println!("  Readings: {}", readings.len());
    if let (Some(first), Some(last)) = (readings.first(), readings.last()) {
        println!("  From: {}", first.datetime().unwrap_or("?"));
        println!("  To:   {}", last.datetime().unwrap_or("?"));
    }
    match average {
        Some(_) => println!("  Average: {} gCO2eq/kWh", format_average(average)),
        None => println!("  Average: n/a (no readings)"),
    }

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(
    loaded: Result<Config, envy::Error>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config(loaded)?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    api::serve(&config).await?;
    Ok(())
}
