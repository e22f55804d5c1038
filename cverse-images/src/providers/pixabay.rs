//! Pixabay adapter
//!
//! Illustration search restricted to the people category. Results are
//! cartoon-style artwork rather than the character itself, hence a fixed
//! confidence.

use super::{fetch_json, or_empty, usable_key, ImageProvider, ProviderError};
use crate::types::{CandidateImage, CharacterQuery, ImageSource};
use async_trait::async_trait;
use serde::Deserialize;

pub const PIXABAY_API_URL: &str = "https://pixabay.com";
const LICENSE: &str = "Pixabay License (Free for commercial use)";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Hit {
    #[serde(rename = "webformatURL")]
    webformat_url: Option<String>,
    user: Option<String>,
    webformat_width: Option<u32>,
    webformat_height: Option<u32>,
}

pub struct PixabayProvider {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    confidence: f32,
}

impl PixabayProvider {
    pub fn new(http_client: reqwest::Client, api_key: Option<String>, confidence: f32) -> Self {
        Self {
            http_client,
            api_key: usable_key(api_key),
            base_url: PIXABAY_API_URL.to_string(),
            confidence,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn search_terms(query: &CharacterQuery) -> Vec<String> {
        vec![
            format!("{} cartoon", query.species_name().unwrap_or("person")),
            "superhero illustration".to_string(),
        ]
    }

    async fn try_search(
        &self,
        api_key: &str,
        query: &CharacterQuery,
    ) -> Result<Vec<CandidateImage>, ProviderError> {
        let url = format!("{}/api/", self.base_url);
        let mut candidates = Vec::new();

        for term in Self::search_terms(query) {
            tracing::debug!(query = %term, "Querying Pixabay");
            let request = self.http_client.get(&url).query(&[
                ("key", api_key),
                ("q", term.as_str()),
                ("image_type", "illustration"),
                ("category", "people"),
                ("per_page", "3"),
                ("safesearch", "true"),
            ]);
            let response: SearchResponse = fetch_json(request).await?;

            if let Some(candidate) = response.hits.iter().find_map(|h| self.candidate(h)) {
                candidates.push(candidate);
            }
        }

        Ok(candidates)
    }

    fn candidate(&self, hit: &Hit) -> Option<CandidateImage> {
        let url = hit.webformat_url.clone()?;
        Some(CandidateImage {
            url,
            source: ImageSource::Pixabay,
            license: LICENSE.to_string(),
            attribution: format!(
                "Image by {} from Pixabay",
                hit.user.as_deref().unwrap_or("Unknown")
            ),
            confidence: self.confidence,
            width: hit.webformat_width.unwrap_or(400),
            height: hit.webformat_height.unwrap_or(600),
        })
    }
}

#[async_trait]
impl ImageProvider for PixabayProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Pixabay
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &CharacterQuery) -> Vec<CandidateImage> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Vec::new();
        };
        or_empty(self.source(), &query.name, self.try_search(api_key, query).await)
    }
}
