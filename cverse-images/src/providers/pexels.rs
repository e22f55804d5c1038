//! Pexels adapter
//!
//! Stock portrait photos; fixed confidence like the other stock providers.

use super::{fetch_json, or_empty, usable_key, ImageProvider, ProviderError};
use crate::types::{CandidateImage, CharacterQuery, ImageSource};
use async_trait::async_trait;
use serde::Deserialize;

pub const PEXELS_API_URL: &str = "https://api.pexels.com";
const LICENSE: &str = "Pexels License (Free for commercial use)";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Default, Deserialize)]
struct Photo {
    src: Option<PhotoSrc>,
    photographer: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotoSrc {
    medium: Option<String>,
}

pub struct PexelsProvider {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    confidence: f32,
}

impl PexelsProvider {
    pub fn new(http_client: reqwest::Client, api_key: Option<String>, confidence: f32) -> Self {
        Self {
            http_client,
            api_key: usable_key(api_key),
            base_url: PEXELS_API_URL.to_string(),
            confidence,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn search_terms(query: &CharacterQuery) -> Vec<String> {
        vec![
            format!("{} portrait", query.species_name().unwrap_or("person")),
            "superhero costume".to_string(),
        ]
    }

    async fn try_search(
        &self,
        api_key: &str,
        query: &CharacterQuery,
    ) -> Result<Vec<CandidateImage>, ProviderError> {
        let url = format!("{}/v1/search", self.base_url);
        let mut candidates = Vec::new();

        for term in Self::search_terms(query) {
            tracing::debug!(query = %term, "Querying Pexels");
            let request = self
                .http_client
                .get(&url)
                .header(reqwest::header::AUTHORIZATION, api_key)
                .query(&[
                    ("query", term.as_str()),
                    ("per_page", "3"),
                    ("orientation", "portrait"),
                ]);
            let response: SearchResponse = fetch_json(request).await?;

            if let Some(candidate) = response.photos.iter().find_map(|p| self.candidate(p)) {
                candidates.push(candidate);
            }
        }

        Ok(candidates)
    }

    fn candidate(&self, photo: &Photo) -> Option<CandidateImage> {
        let url = photo.src.as_ref()?.medium.clone()?;
        Some(CandidateImage {
            url,
            source: ImageSource::Pexels,
            license: LICENSE.to_string(),
            attribution: format!(
                "Photo by {} from Pexels",
                photo.photographer.as_deref().unwrap_or("Unknown")
            ),
            confidence: self.confidence,
            width: photo.width.unwrap_or(400),
            height: photo.height.unwrap_or(600),
        })
    }
}

#[async_trait]
impl ImageProvider for PexelsProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Pexels
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_mapping_defaults_dimensions() {
        let provider = PexelsProvider::new(reqwest::Client::new(), Some("k".into()), 0.3);
        let response: SearchResponse = serde_json::from_str(
            r#"{"photos":[{"src":{"medium":"https://images.pexels.com/m.jpeg"},"photographer":"Lee"}]}"#,
        )
        .unwrap();
        let candidate = provider.candidate(&response.photos[0]).unwrap();
        assert_eq!(candidate.url, "https://images.pexels.com/m.jpeg");
        assert_eq!(candidate.attribution, "Photo by Lee from Pexels");
        assert_eq!((candidate.width, candidate.height), (400, 600));
    }

    #[test]
    fn test_empty_key_is_unconfigured() {
        let provider = PexelsProvider::new(reqwest::Client::new(), Some(String::new()), 0.3);
        assert!(!provider.is_configured());
    }
}
