//! TMDB (The Movie Database) adapter
//!
//! Searches `/3/search/multi` for the character's franchise and takes the
//! poster (and, for strong matches, the backdrop) of the top result per
//! query. Only used when the character has a universe.

use super::{fetch_json, or_empty, usable_key, ImageProvider, ProviderError};
use crate::scoring::{ScoredText, ScoringContext, ScoringRules};
use crate::types::{CandidateImage, CharacterQuery, ImageSource};
use async_trait::async_trait;
use serde::Deserialize;

pub const TMDB_API_URL: &str = "https://api.themoviedb.org";
const TMDB_IMAGE_URL: &str = "https://image.tmdb.org/t/p";
const LICENSE: &str = "Fair Use (TMDB API)";

/// Backdrops are only offered for matches scoring above this
const BACKDROP_MIN_CONFIDENCE: f32 = 0.7;
/// Backdrops rank slightly below the poster of the same result
const BACKDROP_FACTOR: f32 = 0.8;

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f64>,
}

impl SearchResult {
    fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

pub struct TmdbProvider {
    http_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    rules: ScoringRules,
}

impl TmdbProvider {
    pub fn new(http_client: reqwest::Client, api_key: Option<String>, rules: ScoringRules) -> Self {
        Self {
            http_client,
            api_key: usable_key(api_key),
            base_url: TMDB_API_URL.to_string(),
            rules,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `"{name} {universe}"`, `"{universe}"`, `"{name}"`
    fn search_terms(name: &str, universe: &str) -> Vec<String> {
        vec![
            format!("{} {}", name, universe),
            universe.to_string(),
            name.to_string(),
        ]
    }

    async fn try_search(
        &self,
        api_key: &str,
        name: &str,
        universe: &str,
    ) -> Result<Vec<CandidateImage>, ProviderError> {
        let url = format!("{}/3/search/multi", self.base_url);
        let mut candidates = Vec::new();

        for term in Self::search_terms(name, universe) {
            tracing::debug!(query = %term, "Querying TMDB");
            let request = self
                .http_client
                .get(&url)
                .query(&[("api_key", api_key), ("query", term.as_str())]);
            let response: SearchResponse = fetch_json(request).await?;

            if let Some(top) = response.results.first() {
                candidates.extend(self.candidates_from_result(name, universe, top));
            }
        }

        Ok(candidates)
    }

    fn candidates_from_result(
        &self,
        name: &str,
        universe: &str,
        result: &SearchResult,
    ) -> Vec<CandidateImage> {
        let confidence = self.rules.score(
            &ScoringContext {
                name,
                universe: Some(universe),
            },
            &ScoredText {
                title: result.display_title(),
                snippet: result.overview.as_deref().unwrap_or_default(),
                rating: result.vote_average,
            },
        );
        let attribution = format!("{} - The Movie Database (TMDB)", result.display_title());
        let mut candidates = Vec::new();

        if let Some(poster) = result.poster_path.as_deref().filter(|p| !p.is_empty()) {
            candidates.push(CandidateImage {
                url: format!("{}/w500{}", TMDB_IMAGE_URL, poster),
                source: ImageSource::Tmdb,
                license: LICENSE.to_string(),
                attribution: attribution.clone(),
                confidence,
                width: 500,
                height: 750,
            });
        }

        if let Some(backdrop) = result.backdrop_path.as_deref().filter(|p| !p.is_empty()) {
            if confidence > BACKDROP_MIN_CONFIDENCE {
                candidates.push(CandidateImage {
                    url: format!("{}/w1280{}", TMDB_IMAGE_URL, backdrop),
                    source: ImageSource::Tmdb,
                    license: LICENSE.to_string(),
                    attribution,
                    confidence: confidence * BACKDROP_FACTOR,
                    width: 1280,
                    height: 720,
                });
            }
        }

        candidates
    }
}

#[async_trait]
impl ImageProvider for TmdbProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Tmdb
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &CharacterQuery) -> Vec<CandidateImage> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Vec::new();
        };
        let Some(universe) = query.universe_name() else {
            return Vec::new();
        };

        or_empty(
            self.source(),
            &query.name,
            self.try_search(api_key, &query.name, universe).await,
        )
    }
}
