use anyhow::{Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

use navigator::config::DbConfig;
use navigator::introspect::Introspector;
use navigator::server::{run_server, AppState, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "navigator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Path to .env file for connection config
    #[arg(long, default_value = "./.env")]
    env_file: PathBuf,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = ?e, "Fatal error");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    info!("navigator v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = DbConfig::load(&cli.env_file).context("Failed to load database configuration")?;
    debug!(connection = ?config.redacted_connection_string(), "Loaded configuration");

    let introspector = connect(&config)?;
    let state = Arc::new(AppState::new(introspector));

    let server_config = ServerConfig {
        host: cli.host,
        port: cli.port,
    };
    debug!(server_config = ?server_config, "Server config");

    run_server(server_config, state).await
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Build the introspector; connections are opened on first use
#[cfg(feature = "postgres")]
fn connect(config: &DbConfig) -> Result<Arc<dyn Introspector>> {
    use navigator::PostgresIntrospector;

    let introspector = PostgresIntrospector::from_config(config).with_context(|| {
        format!(
            "Failed to configure PostgreSQL at {}",
            config.redacted_connection_string()
        )
    })?;

    Ok(Arc::new(introspector))
}

#[cfg(not(feature = "postgres"))]
fn connect(_config: &DbConfig) -> Result<Arc<dyn Introspector>> {
    anyhow::bail!("PostgreSQL support not enabled. Rebuild with --features postgres")
}
