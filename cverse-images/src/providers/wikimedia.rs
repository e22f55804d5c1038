//! Wikimedia Commons adapter
//!
//! Keyword search over the File namespace (6). The first two hits of every
//! search term are scored; hits at or below the profile's minimum are
//! dropped before they ever reach selection.

use super::{fetch_json, or_empty, ImageProvider, ProviderError};
use crate::scoring::{ScoredText, ScoringContext, ScoringRules};
use crate::types::{CandidateImage, CharacterQuery, ImageSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const WIKIMEDIA_URL: &str = "https://commons.wikimedia.org";
const RESULTS_PER_TERM: usize = 2;
const FILE_WIDTH: u32 = 500;

/// Profile-dependent search behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikimediaSettings {
    /// Appended to the name to form each search term, e.g. `"mythology"`
    pub term_suffixes: Vec<String>,
    /// Appended to every term as a search operator, e.g. `" -copyright"`
    #[serde(default)]
    pub query_suffix: String,
    /// Hits must score strictly above this to be kept
    pub min_confidence: f32,
    pub license: String,
    pub rules: ScoringRules,
}

impl WikimediaSettings {
    pub fn legal() -> Self {
        Self {
            term_suffixes: strings(&["character", "mythology", "literature", "public domain"]),
            query_suffix: String::new(),
            min_confidence: 0.2,
            license: "Creative Commons / Public Domain".to_string(),
            rules: ScoringRules::wikimedia_legal(),
        }
    }

    pub fn commercial() -> Self {
        Self {
            term_suffixes: strings(&[
                "public domain",
                "CC0",
                "mythology",
                "literature classic",
                "historical",
            ]),
            query_suffix: " -copyright".to_string(),
            min_confidence: 0.4,
            license: "Creative Commons / Public Domain (Commercial OK)".to_string(),
            rules: ScoringRules::wikimedia_commercial(),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    query: Option<QueryBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchHit {
    title: Option<String>,
    snippet: Option<String>,
}

pub struct WikimediaProvider {
    http_client: reqwest::Client,
    base_url: String,
    settings: WikimediaSettings,
}

impl WikimediaProvider {
    pub fn new(http_client: reqwest::Client, settings: WikimediaSettings) -> Self {
        Self {
            http_client,
            base_url: WIKIMEDIA_URL.to_string(),
            settings,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn search_terms(&self, name: &str) -> Vec<String> {
        self.settings
            .term_suffixes
            .iter()
            .map(|suffix| format!("{} {}{}", name, suffix, self.settings.query_suffix))
            .collect()
    }

    async fn try_search(&self, name: &str) -> Result<Vec<CandidateImage>, ProviderError> {
        let url = format!("{}/w/api.php", self.base_url);
        let mut candidates = Vec::new();

        for term in self.search_terms(name) {
            tracing::debug!(query = %term, "Querying Wikimedia Commons");
            let request = self.http_client.get(&url).query(&[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", term.as_str()),
                ("srnamespace", "6"),
                ("srlimit", "3"),
                ("origin", "*"),
            ]);
            let response: SearchResponse = fetch_json(request).await?;
            let hits = response.query.map(|q| q.search).unwrap_or_default();

            candidates.extend(
                hits.iter()
                    .take(RESULTS_PER_TERM)
                    .filter_map(|hit| self.candidate_from_hit(name, hit)),
            );
        }

        Ok(candidates)
    }

    fn candidate_from_hit(&self, name: &str, hit: &SearchHit) -> Option<CandidateImage> {
        let title = hit.title.as_deref().filter(|t| !t.trim().is_empty())?;
        let confidence = self.settings.rules.score(
            &ScoringContext {
                name,
                universe: None,
            },
            &ScoredText {
                title,
                snippet: hit.snippet.as_deref().unwrap_or_default(),
                rating: None,
            },
        );
        if confidence <= self.settings.min_confidence {
            return None;
        }

        let file_name = title.strip_prefix("File:").unwrap_or(title);
        Some(CandidateImage {
            url: format!(
                "{}/wiki/Special:FilePath/{}?width={}",
                self.base_url,
                urlencoding::encode(file_name),
                FILE_WIDTH
            ),
            source: ImageSource::Wikimedia,
            license: self.settings.license.clone(),
            attribution: format!("Wikimedia Commons - {}", file_name),
            confidence,
            width: FILE_WIDTH,
            height: FILE_WIDTH,
        })
    }
}

#[async_trait]
impl ImageProvider for WikimediaProvider {
    fn source(&self) -> ImageSource {
        ImageSource::Wikimedia
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn search(&self, query: &CharacterQuery) -> Vec<CandidateImage> {
        or_empty(self.source(), &query.name, self.try_search(&query.name).await)
    }
}
