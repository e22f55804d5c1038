//! Candidate gathering, selection and fallback
//!
//! The resolver runs the profile's providers in priority order, one after the
//! other, appends the profile's generated avatar and picks the single best
//! candidate above the acceptance threshold. When nothing qualifies the
//! avatar is the answer, so a resolution always yields an image.

use crate::avatar::generate_avatar;
use crate::config::{ProviderEndpoints, ProviderKeys};
use crate::profile::ResolverProfile;
use crate::providers::{
    ImageProvider, PexelsProvider, PixabayProvider, ProviderKind, TmdbProvider, UnsplashProvider,
    WikimediaProvider,
};
use crate::types::{CandidateImage, CharacterQuery};
use tracing::debug;

pub struct ImageResolver {
    profile: ResolverProfile,
    providers: Vec<Box<dyn ImageProvider>>,
}

impl ImageResolver {
    /// Resolver over an explicit provider list (queried in the given order)
    pub fn new(profile: ResolverProfile, providers: Vec<Box<dyn ImageProvider>>) -> Self {
        Self { profile, providers }
    }

    /// Build the profile's providers with the given keys and base URLs
    pub fn from_profile(
        profile: ResolverProfile,
        keys: &ProviderKeys,
        http_client: &reqwest::Client,
        endpoints: &ProviderEndpoints,
    ) -> Self {
        let providers = profile
            .providers
            .iter()
            .map(|kind| build_provider(*kind, &profile, keys, http_client, endpoints))
            .collect();
        Self::new(profile, providers)
    }

    pub fn profile(&self) -> &ResolverProfile {
        &self.profile
    }

    /// All candidates from every provider, then the fallback avatar
    pub async fn gather_candidates(&self, query: &CharacterQuery) -> Vec<CandidateImage> {
        let mut candidates = Vec::new();

        for provider in &self.providers {
            if !provider.is_configured() {
                debug!(provider = %provider.source(), "Skipping unconfigured provider");
                continue;
            }
            candidates.extend(provider.search(query).await);
        }

        candidates.push(generate_avatar(&query.name, &self.profile.avatar));
        candidates
    }

    /// The single image to use for `query`
    pub async fn resolve(&self, query: &CharacterQuery) -> CandidateImage {
        let candidates = self.gather_candidates(query).await;

        match select_best(&candidates, self.profile.acceptance_threshold) {
            Some(best) => {
                debug!(
                    character = %query.name,
                    source = %best.source,
                    confidence = best.confidence,
                    candidates = candidates.len(),
                    "Selected image"
                );
                best.clone()
            }
            None => {
                debug!(character = %query.name, "No candidate above threshold, using avatar");
                generate_avatar(&query.name, &self.profile.avatar)
            }
        }
    }
}

fn build_provider(
    kind: ProviderKind,
    profile: &ResolverProfile,
    keys: &ProviderKeys,
    http_client: &reqwest::Client,
    endpoints: &ProviderEndpoints,
) -> Box<dyn ImageProvider> {
    let http = http_client.clone();
    let stock = profile.stock_confidence;

    match kind {
        ProviderKind::Tmdb => Box::new(
            TmdbProvider::new(http, keys.get(kind), profile.tmdb_rules.clone())
                .with_base_url(&endpoints.tmdb),
        ),
        ProviderKind::Wikimedia => Box::new(
            WikimediaProvider::new(http, profile.wikimedia.clone())
                .with_base_url(&endpoints.wikimedia),
        ),
        ProviderKind::Unsplash => Box::new(
            UnsplashProvider::new(http, keys.get(kind), stock.unsplash)
                .with_base_url(&endpoints.unsplash),
        ),
        ProviderKind::Pixabay => Box::new(
            PixabayProvider::new(http, keys.get(kind), stock.pixabay)
                .with_base_url(&endpoints.pixabay),
        ),
        ProviderKind::Pexels => Box::new(
            PexelsProvider::new(http, keys.get(kind), stock.pexels)
                .with_base_url(&endpoints.pexels),
        ),
    }
}

/// Highest-confidence candidate strictly above `threshold`; ties keep the earliest
pub fn select_best(candidates: &[CandidateImage], threshold: f32) -> Option<&CandidateImage> {
    candidates
        .iter()
        .filter(|c| c.confidence > threshold)
        .fold(None, |best: Option<&CandidateImage>, candidate| match best {
            Some(current) if current.confidence >= candidate.confidence => Some(current),
            _ => Some(candidate),
        })
}
