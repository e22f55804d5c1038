//! cverse-images - character portrait resolver service
//!
//! Serves the manual selection and batch update API, or with `--update-all`
//! runs a single batch update and exits.

use anyhow::{Context, Result};
use clap::Parser;
use cverse_common::config::{prepare_root_folder, resolve_root_folder, TomlConfig};
use cverse_common::db::init_database;
use cverse_images::batch::update_all;
use cverse_images::config::{resolve_profile, ProviderKeys};
use cverse_images::db::SqliteCharacterStore;
use cverse_images::providers::build_http_client;
use cverse_images::{build_router, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cverse-images", version, about = "Character portrait resolver")]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Data folder holding cverse.db
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Resolver profile: legal or commercial
    #[arg(long)]
    profile: Option<String>,

    /// Run one batch update over every character and exit
    #[arg(long)]
    update_all: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = TomlConfig::load_default().context("Failed to load config file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.clone().into()),
        )
        .init();

    info!(
        "Starting CharacterVerse image resolver (cverse-images) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = prepare_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let profile = resolve_profile(args.profile.as_deref(), &toml_config)?;
    info!(
        profile = %profile.name,
        providers = ?profile.providers,
        "Resolver profile selected"
    );

    let keys = ProviderKeys::resolve(&pool, &toml_config).await?;
    let http_client = build_http_client(Duration::from_secs(toml_config.request_timeout_secs))?;
    let store = Arc::new(SqliteCharacterStore::new(pool.clone()));

    let state = AppState::new(pool, store, http_client, profile, keys);

    if args.update_all {
        let resolver = state.resolver().await;
        let stats = update_all(&resolver, state.store.as_ref()).await?;
        info!(
            "Batch finished: {} updated, {} failed, {} skipped",
            stats.updated, stats.failed, stats.skipped
        );
        return Ok(());
    }

    let port = args.port.unwrap_or(toml_config.port);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("cverse-images listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
