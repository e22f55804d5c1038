//! cverse-images library interface
//!
//! Character portrait resolution: provider adapters, scoring, selection with
//! a generated-avatar fallback, the batch update driver and the HTTP API.

pub mod api;
pub mod avatar;
pub mod batch;
pub mod config;
pub mod db;
pub mod error;
pub mod image_urls;
pub mod profile;
pub mod providers;
pub mod resolver;
pub mod scoring;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use crate::config::{ProviderEndpoints, ProviderKeys};
use crate::db::CharacterStore;
use crate::profile::ResolverProfile;
use crate::resolver::ImageResolver;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (settings table)
    pub db: SqlitePool,
    /// Character storage collaborator
    pub store: Arc<dyn CharacterStore>,
    /// Shared outbound client for providers and URL checks
    pub http_client: reqwest::Client,
    pub profile: Arc<ResolverProfile>,
    /// Provider keys; updated in place by the settings API
    pub keys: Arc<RwLock<ProviderKeys>>,
    pub endpoints: Arc<ProviderEndpoints>,
    /// Held while a batch update runs
    pub batch_lock: Arc<Mutex<()>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        store: Arc<dyn CharacterStore>,
        http_client: reqwest::Client,
        profile: ResolverProfile,
        keys: ProviderKeys,
    ) -> Self {
        Self {
            db,
            store,
            http_client,
            profile: Arc::new(profile),
            keys: Arc::new(RwLock::new(keys)),
            endpoints: Arc::new(ProviderEndpoints::default()),
            batch_lock: Arc::new(Mutex::new(())),
            startup_time: Utc::now(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = Arc::new(endpoints);
        self
    }

    /// Resolver over the current keys
    pub async fn resolver(&self) -> ImageResolver {
        let keys = self.keys.read().await.clone();
        ImageResolver::from_profile(
            (*self.profile).clone(),
            &keys,
            &self.http_client,
            &self.endpoints,
        )
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::image_routes())
        .merge(api::batch_routes())
        .merge(api::settings_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
