//! Unsplash adapter
//!
//! Generic artistic photos (free for commercial use), so every result gets
//! the same fixed confidence instead of keyword scoring.

use super::{fetch_json, or_empty, usable_key, ImageProvider, ProviderError};
use crate::types::{CandidateImage, CharacterQuery, ImageSource};
use async_trait::async_trait;
use serde::Deserialize;

pub const UNSPLASH_API_URL: &str = "https://api.unsplash.com";
const LICENSE: &str = "Unsplash License (Free for commercial use)";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Default, Deserialize)]
struct Photo {
    urls: Option<PhotoUrls>,
    user: Option<PhotoUser>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotoUser {
    name: Option<String>,
}

pub struct UnsplashProvider {
    http_client: reqwest::Client,
    access_key: Option<String>,
    base_url: String,
    confidence: f32,
}

impl UnsplashProvider {
    pub fn new(http_client: reqwest::Client, access_key: Option<String>, confidence: f32) -> Self {
        Self {
            http_client,
            access_key: usable_key(access_key),
            base_url: UNSPLASH_API_URL.to_string(),
            confidence,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn search_terms(query: &CharacterQuery) -> Vec<String> {
        vec![
            format!("{} portrait art", query.species_name().unwrap_or("person")),
            format!("{} character", query.universe_name().unwrap_or("fantasy")),
        ]
    }

    async fn try_search(
        &self,
        access_key: &str,
        query: &CharacterQuery,
    ) -> Result<Vec<CandidateImage>, ProviderError> {
        let url = format!("{}/search/photos", self.base_url);
        let mut candidates = Vec::new();

        for term in Self::search_terms(query) {
            tracing::debug!(query = %term, "Querying Unsplash");
            let request = self
                .http_client
                .get(&url)
                .header(reqwest::header::AUTHORIZATION, format!("Client-ID {}", access_key))
                .query(&[
                    ("query", term.as_str()),
                    ("per_page", "3"),
                    ("orientation", "portrait"),
                ]);
            let response: SearchResponse = fetch_json(request).await?;

            if let Some(candidate) = response.results.iter().find_map(|p| self.candidate(p)) {
                candidates.push(candidate);
            }
        }

        Ok(candidates)
    }

    fn candidate(&self, photo: &Photo) -> Option<CandidateImage> {
        let url = photo.urls.as_ref()?.regular.clone()?;
        let photographer = photo
            .user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .unwrap_or("Unknown");
        Some(CandidateImage {
            url,
            source: ImageSource::Unsplash,
            license: LICENSE.to_string(),
            attribution: format!("Photo by {} on Unsplash", photographer),
            confidence: self.confidence,
            width: photo.width.unwrap_or(400),
            height: photo.height.unwrap_or(600),
        })
    }
}

#[async_trait]
impl ImageProvider for UnsplashProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Unsplash
    }

    fn is_configured(&self) -> bool {
        self.access_key.is_some()
    }

    async fn search(&self, query: &CharacterQuery) -> Vec<CandidateImage> {
        let Some(access_key) = self.access_key.as_deref() else {
            return Vec::new();
        };
        or_empty(self.source(), &query.name, self.try_search(access_key, query).await)
    }
}
