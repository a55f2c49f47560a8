//! Token Relay Service - Entry Point

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use token_relay::config::{Config, defaults};
use token_relay::server::RelayServer;
use token_relay::service::TokenService;
use token_relay::store::{self, StorageKind};

#[derive(Parser, Debug)]
#[command(name = "token-relay")]
#[command(about = "HTTP service that relays OAuth tokens to a bot")]
#[command(version)]
struct Cli {
    /// Storage backend
    #[arg(long, default_value = "memory", env = "TOKEN_RELAY_BACKEND")]
    backend: StorageKind,

    /// HTTP server port
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Directory served for unmatched paths (login frontend)
    #[arg(long, default_value = defaults::STATIC_DIR, env = "STATIC_DIR")]
    static_dir: PathBuf,

    /// JSON file path (file backend)
    #[arg(long, default_value = defaults::FILE_PATH, env = "TOKEN_RELAY_FILE")]
    file_path: PathBuf,

    /// Redis connection URL (redis backend)
    #[arg(long, default_value = defaults::REDIS_URL, env = "REDIS_URL")]
    redis_url: String,

    /// Paste service API endpoint (paste backend)
    #[arg(long, env = "PASTE_API_URL")]
    paste_api_url: Option<String>,

    /// Paste service API token (paste backend)
    #[arg(long, env = "PASTE_API_TOKEN")]
    paste_api_token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            backend: self.backend,
            port: self.port,
            static_dir: self.static_dir,
            file_path: self.file_path,
            redis_url: self.redis_url,
            paste_api_url: self.paste_api_url,
            paste_api_token: self.paste_api_token,
            ..Config::new(self.backend)
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %cli.backend,
        port = cli.port,
        "Starting token relay"
    );

    let config = cli.into_config();
    let store = store::connect(&config).await?;
    let service = TokenService::new(store);
    let server = RelayServer::new(service, config.static_dir.clone());

    server.run(config.port).await?;

    Ok(())
}
