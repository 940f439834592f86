//! Guess Duel Server Binary

use clap::Parser;
use guess_duel::{
    api::ApiServer,
    config::{ConfigLoader, DuelConfig, StorageBackend},
    services::GameService,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "guess-duel")]
#[command(about = "Two-player number guessing game server", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Listen address
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(long)]
    port: Option<u16>,

    /// History backend (json, memory, rocksdb)
    #[arg(long)]
    storage: Option<StorageBackend>,

    /// JSON history file
    #[arg(long)]
    history_path: Option<String>,

    /// Maximum number of finished matches kept
    #[arg(long)]
    history_cap: Option<usize>,

    /// Rounds per match
    #[arg(long)]
    rounds: Option<u32>,

    /// Seed for player order and secret numbers
    #[arg(long)]
    seed: Option<u64>,

    /// Allowed CORS origins (comma-separated, use * for all)
    #[arg(long)]
    cors_origins: Option<String>,
}

impl Args {
    /// Explicit flags win over file and environment
    fn apply(self, config: &mut DuelConfig) {
        if let Some(host) = self.host {
            config.api.host = host;
        }
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(backend) = self.storage {
            config.storage.backend = backend;
        }
        if let Some(path) = self.history_path {
            config.storage.history_path = path;
        }
        if let Some(cap) = self.history_cap {
            config.storage.history_cap = cap;
        }
        if let Some(rounds) = self.rounds {
            config.game.rounds = rounds;
        }
        if self.seed.is_some() {
            config.game.seed = self.seed;
        }
        if let Some(origins) = self.cors_origins {
            config.api.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_path(path);
    }
    let mut config = loader.load()?;
    args.apply(&mut config);
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.monitoring.log_filter.as_str().into()),
        )
        .init();

    info!("🚀 Starting Guess Duel server");
    info!("   Rounds per match: {}", config.game.rounds);
    info!("   History backend: {:?}", config.storage.backend);
    if config.storage.backend == StorageBackend::JsonFile {
        info!("   History file: {}", config.storage.history_path);
    }

    let service = Arc::new(GameService::from_config(&config)?);
    ApiServer::new(config.api.clone(), service).run().await
}
