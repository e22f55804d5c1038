//! Runtime configuration for the image resolver
//!
//! Provider API keys resolve with Database → ENV → TOML priority; the
//! resolver profile resolves CLI → TOML → default.

use crate::profile::ResolverProfile;
use crate::providers::{
    is_valid_key, pexels::PEXELS_API_URL, pixabay::PIXABAY_API_URL, tmdb::TMDB_API_URL,
    unsplash::UNSPLASH_API_URL, wikimedia::WIKIMEDIA_URL, ProviderKind,
};
use cverse_common::config::TomlConfig;
use cverse_common::{Error, Result};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info, warn};

/// Environment variable carrying a provider's key
pub fn env_var_name(kind: ProviderKind) -> Option<&'static str> {
    match kind {
        ProviderKind::Tmdb => Some("TMDB_API_KEY"),
        ProviderKind::Unsplash => Some("UNSPLASH_ACCESS_KEY"),
        ProviderKind::Pixabay => Some("PIXABAY_API_KEY"),
        ProviderKind::Pexels => Some("PEXELS_API_KEY"),
        ProviderKind::Wikimedia => None,
    }
}

fn toml_key(toml_config: &TomlConfig, kind: ProviderKind) -> Option<&String> {
    match kind {
        ProviderKind::Tmdb => toml_config.tmdb_api_key.as_ref(),
        ProviderKind::Unsplash => toml_config.unsplash_access_key.as_ref(),
        ProviderKind::Pixabay => toml_config.pixabay_api_key.as_ref(),
        ProviderKind::Pexels => toml_config.pexels_api_key.as_ref(),
        ProviderKind::Wikimedia => None,
    }
}

/// Resolved API keys for the keyed providers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderKeys {
    pub tmdb: Option<String>,
    pub unsplash: Option<String>,
    pub pixabay: Option<String>,
    pub pexels: Option<String>,
}

impl ProviderKeys {
    /// Resolve every keyed provider; a provider with no valid key stays `None`
    pub async fn resolve(db: &Pool<Sqlite>, toml_config: &TomlConfig) -> Result<Self> {
        let mut keys = Self::default();
        for kind in ProviderKind::KEYED {
            let key = resolve_provider_key(db, toml_config, kind).await?;
            keys.set(kind, key);
        }
        Ok(keys)
    }

    pub fn get(&self, kind: ProviderKind) -> Option<String> {
        match kind {
            ProviderKind::Tmdb => self.tmdb.clone(),
            ProviderKind::Unsplash => self.unsplash.clone(),
            ProviderKind::Pixabay => self.pixabay.clone(),
            ProviderKind::Pexels => self.pexels.clone(),
            ProviderKind::Wikimedia => None,
        }
    }

    pub fn set(&mut self, kind: ProviderKind, key: Option<String>) {
        match kind {
            ProviderKind::Tmdb => self.tmdb = key,
            ProviderKind::Unsplash => self.unsplash = key,
            ProviderKind::Pixabay => self.pixabay = key,
            ProviderKind::Pexels => self.pexels = key,
            ProviderKind::Wikimedia => {}
        }
    }
}

/// Resolve one provider's API key
///
/// **Priority:** Database → ENV → TOML. Blank values are ignored at every tier.
pub async fn resolve_provider_key(
    db: &Pool<Sqlite>,
    toml_config: &TomlConfig,
    kind: ProviderKind,
) -> Result<Option<String>> {
    let db_key = crate::db::settings::get_provider_api_key(db, kind)
        .await?
        .filter(|k| is_valid_key(k));
    let env_key = env_var_name(kind)
        .and_then(|name| std::env::var(name).ok())
        .filter(|k| is_valid_key(k));
    let toml_key = toml_key(toml_config, kind)
        .filter(|k| is_valid_key(k))
        .cloned();

    let sources: Vec<&str> = [
        db_key.as_ref().map(|_| "database"),
        env_key.as_ref().map(|_| "environment"),
        toml_key.as_ref().map(|_| "TOML"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if sources.len() > 1 {
        warn!(
            provider = kind.as_str(),
            "API key found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    match sources.first() {
        Some(source) => info!(provider = kind.as_str(), "API key loaded from {}", source),
        None => debug!(provider = kind.as_str(), "No API key configured"),
    }

    Ok(db_key.or(env_key).or(toml_key))
}

/// Base URLs for every provider; overridden in tests to point at a mock server
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEndpoints {
    pub tmdb: String,
    pub wikimedia: String,
    pub unsplash: String,
    pub pixabay: String,
    pub pexels: String,
}

impl ProviderEndpoints {
    /// Every provider served from the same base URL
    pub fn all(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            tmdb: base.clone(),
            wikimedia: base.clone(),
            unsplash: base.clone(),
            pixabay: base.clone(),
            pexels: base,
        }
    }
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            tmdb: TMDB_API_URL.to_string(),
            wikimedia: WIKIMEDIA_URL.to_string(),
            unsplash: UNSPLASH_API_URL.to_string(),
            pixabay: PIXABAY_API_URL.to_string(),
            pexels: PEXELS_API_URL.to_string(),
        }
    }
}

/// Pick the resolver profile: CLI argument, then TOML, then `commercial`
pub fn resolve_profile(cli_arg: Option<&str>, toml_config: &TomlConfig) -> Result<ResolverProfile> {
    let Some(name) = cli_arg.or(toml_config.profile.as_deref()) else {
        return Ok(ResolverProfile::default());
    };

    ResolverProfile::by_name(name).ok_or_else(|| {
        Error::Config(format!(
            "Unknown resolver profile '{}' (expected 'legal' or 'commercial')",
            name
        ))
    })
}
