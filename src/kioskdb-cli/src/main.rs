use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use kioskdb_rs::{AuthStore, Config, Databases, FileTokenStore, HttpClient, Session};

mod commands;
mod telemetry;

#[derive(Parser)]
#[command(name = "kioskdb")]
#[command(about = "Command-line access to the UAC and KIOSK backends")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, default_value = "kioskdb.json")]
    config: String,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    }
    .with_env_overrides();

    let token_path = config.token_path();
    let log_dir = token_path
        .parent()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"));
    let guard = telemetry::init_telemetry(&log_dir)?;

    if let Err(e) = &loaded {
        if std::path::Path::new(&cli.config).exists() {
            tracing::warn!("Failed to load {}, using defaults: {}", cli.config, e);
        } else {
            tracing::debug!("No {} found, using defaults", cli.config);
        }
    }
    if config.api_url.is_empty() {
        tracing::warn!("api_url is empty; set it in {} or via KIOSKDB_API_URL", cli.config);
    }
    tracing::debug!("  API URL: {}", config.api_url);
    tracing::debug!("  Session file: {:?}", token_path);

    let session = Session::restore(Arc::new(FileTokenStore::new(token_path)))?;
    let client = HttpClient::from_config(&config, session);
    let auth = AuthStore::from_config(client.clone(), &config);
    let databases = Databases::from_config(client, &config);

    if let Err(e) = commands::handle(cli.command, auth, databases).await {
        tracing::error!("{:#}", e);
        drop(guard);
        std::process::exit(1);
    }

    Ok(())
}
