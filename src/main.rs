use clap::Parser;
use items_sync::config::{DEFAULT_HOST, DEFAULT_MIRROR, DEFAULT_PORT, DEFAULT_PRIMARY};
use items_sync::{IdPolicy, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "items-sync")]
#[command(about = "CRUD service for items stored in a JSON file, mirrored after every change")]
struct Cli {
    /// Interface to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Primary item file
    #[arg(long, default_value = DEFAULT_PRIMARY)]
    data: PathBuf,

    /// Mirror file rewritten after every change
    #[arg(long, default_value = DEFAULT_MIRROR)]
    output: PathBuf,

    /// Write single-line JSON instead of indented
    #[arg(long)]
    compact: bool,

    /// Id assignment: max (reuses a deleted highest id) or monotonic
    #[arg(long, default_value = "max")]
    id_policy: IdPolicy,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        ServerConfig {
            host: cli.host,
            port: cli.port,
            primary_path: cli.data,
            mirror_path: cli.output,
            pretty: !cli.compact,
            id_policy: cli.id_policy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from(Cli::parse());
    let store = config.open_store()?;
    info!(
        primary = %config.primary_path.display(),
        mirror = %config.mirror_path.display(),
        id_policy = %config.id_policy,
        "store ready"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    items_sync::http::serve_with_shutdown(listener, Arc::new(store), shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "cannot listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
