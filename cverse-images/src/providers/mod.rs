//! External image provider adapters
//!
//! Each adapter turns a [`CharacterQuery`] into one or more search calls
//! against a single provider and maps the responses to [`CandidateImage`]s.
//!
//! Adapters never fail towards the resolver: a network error, an error
//! status or an unparseable body is logged and yields an empty list, so one
//! provider's outage never blocks the others. A keyed provider without a
//! configured key returns an empty list without touching the network.
//!
//! Search-term variants are issued sequentially. Results are all-or-nothing
//! per adapter: a failure on any term discards the candidates already
//! collected from earlier terms for that character.

pub mod pexels;
pub mod pixabay;
pub mod tmdb;
pub mod unsplash;
pub mod wikimedia;

pub use pexels::PexelsProvider;
pub use pixabay::PixabayProvider;
pub use tmdb::TmdbProvider;
pub use unsplash::UnsplashProvider;
pub use wikimedia::WikimediaProvider;

use crate::types::{CandidateImage, CharacterQuery, ImageSource};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!(
    "CharacterVerse-Images/",
    env!("CARGO_PKG_VERSION"),
    " (character portrait resolver)"
);

/// Provider call failures; logged at the adapter boundary, never propagated
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Identifies a provider in profiles, settings keys and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Tmdb,
    Wikimedia,
    Unsplash,
    Pixabay,
    Pexels,
}

impl ProviderKind {
    pub const KEYED: [ProviderKind; 4] = [
        ProviderKind::Tmdb,
        ProviderKind::Unsplash,
        ProviderKind::Pixabay,
        ProviderKind::Pexels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Tmdb => "tmdb",
            ProviderKind::Wikimedia => "wikimedia",
            ProviderKind::Unsplash => "unsplash",
            ProviderKind::Pixabay => "pixabay",
            ProviderKind::Pexels => "pexels",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tmdb" => Some(ProviderKind::Tmdb),
            "wikimedia" => Some(ProviderKind::Wikimedia),
            "unsplash" => Some(ProviderKind::Unsplash),
            "pixabay" => Some(ProviderKind::Pixabay),
            "pexels" => Some(ProviderKind::Pexels),
            _ => None,
        }
    }

    /// Whether the provider needs an API key at all
    pub fn requires_key(&self) -> bool {
        !matches!(self, ProviderKind::Wikimedia)
    }

    pub fn source(&self) -> ImageSource {
        match self {
            ProviderKind::Tmdb => ImageSource::Tmdb,
            ProviderKind::Wikimedia => ImageSource::Wikimedia,
            ProviderKind::Unsplash => ImageSource::Unsplash,
            ProviderKind::Pixabay => ImageSource::Pixabay,
            ProviderKind::Pexels => ImageSource::Pexels,
        }
    }

    /// Human-readable description used by the batch info endpoint
    pub fn description(&self) -> &'static str {
        match self {
            ProviderKind::Tmdb => "TMDB (The Movie Database) - movie/TV characters",
            ProviderKind::Wikimedia => "Wikimedia Commons - public domain / Creative Commons",
            ProviderKind::Unsplash => "Unsplash - free for commercial use",
            ProviderKind::Pixabay => "Pixabay - free for commercial use",
            ProviderKind::Pexels => "Pexels - free for commercial use",
        }
    }
}

/// One external image provider
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Tag written to `image_source` for candidates from this provider
    fn source(&self) -> ImageSource;

    /// False when a required API key is missing; `search` then returns nothing
    fn is_configured(&self) -> bool;

    /// Search for candidates; never fails, see module docs
    async fn search(&self, query: &CharacterQuery) -> Vec<CandidateImage>;
}

/// API key validity: non-empty after trimming
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Keep only a usable key
pub(crate) fn usable_key(key: Option<String>) -> Option<String> {
    key.filter(|k| is_valid_key(k))
}

/// Shared HTTP client for every provider and for URL checks
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Network(e.to_string()))
}

/// Send a request and decode a JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api(status.as_u16(), body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Unwrap an adapter result, logging and swallowing the error
pub(crate) fn or_empty(
    source: ImageSource,
    name: &str,
    result: Result<Vec<CandidateImage>, ProviderError>,
) -> Vec<CandidateImage> {
    match result {
        Ok(candidates) => {
            tracing::debug!(
                provider = %source,
                character = %name,
                count = candidates.len(),
                "Provider search complete"
            );
            candidates
        }
        Err(e) => {
            tracing::warn!(
                provider = %source,
                character = %name,
                error = %e,
                "Provider search failed, continuing without its candidates"
            );
            Vec::new()
        }
    }
}
