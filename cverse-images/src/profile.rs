//! Resolver profiles
//!
//! A profile bundles everything that differs between resolution modes:
//! which providers run and in what order, thresholds and scoring tables,
//! the fallback avatar style, and the batch skip rule. Two built-ins exist:
//!
//! - `legal`: TMDB then Wikimedia; any lawful source, fallback avatars are
//!   not written back by the batch driver.
//! - `commercial`: Wikimedia then the stock-photo providers; every source is
//!   cleared for commercial use and the fallback avatar is always written.

use crate::avatar::AvatarStyle;
use crate::providers::wikimedia::WikimediaSettings;
use crate::providers::ProviderKind;
use crate::scoring::ScoringRules;
use cverse_common::db::Character;
use serde::{Deserialize, Serialize};

/// Fixed confidences for providers that return generic artwork
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockConfidence {
    pub unsplash: f32,
    pub pixabay: f32,
    pub pexels: f32,
}

impl Default for StockConfidence {
    fn default() -> Self {
        Self {
            unsplash: 0.3,
            pixabay: 0.4,
            pexels: 0.3,
        }
    }
}

/// Characters matching this rule are left alone by the batch driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkipRule {
    /// Exact `image_source` values that are already good enough
    #[serde(default)]
    pub trusted_sources: Vec<String>,
    /// Substrings of `image_license` marking an image as commercial-safe
    #[serde(default)]
    pub license_markers: Vec<String>,
}

impl SkipRule {
    pub fn should_skip(&self, character: &Character) -> bool {
        let trusted_source = character
            .image_source
            .as_deref()
            .is_some_and(|source| self.trusted_sources.iter().any(|t| t == source));

        let marked_license = character.image_license.as_deref().is_some_and(|license| {
            self.license_markers
                .iter()
                .any(|marker| license.contains(marker.as_str()))
        });

        trusted_source || marked_license
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverProfile {
    pub name: String,
    /// Queried in this order; earlier providers win ties
    pub providers: Vec<ProviderKind>,
    /// Candidates must score strictly above this to be selected
    pub acceptance_threshold: f32,
    pub tmdb_rules: ScoringRules,
    pub wikimedia: WikimediaSettings,
    pub stock_confidence: StockConfidence,
    pub avatar: AvatarStyle,
    pub skip: SkipRule,
    /// Whether the batch driver writes the fallback avatar when nothing qualifies
    pub persist_fallback: bool,
    /// Fixed pause after each resolved character in a batch
    pub batch_delay_ms: u64,
}

impl ResolverProfile {
    pub fn legal() -> Self {
        Self {
            name: "legal".to_string(),
            providers: vec![ProviderKind::Tmdb, ProviderKind::Wikimedia],
            acceptance_threshold: 0.3,
            tmdb_rules: ScoringRules::tmdb(),
            wikimedia: WikimediaSettings::legal(),
            stock_confidence: StockConfidence::default(),
            avatar: AvatarStyle::legal(),
            skip: SkipRule {
                trusted_sources: vec!["TMDB".to_string(), "Wikimedia".to_string()],
                license_markers: Vec::new(),
            },
            persist_fallback: false,
            batch_delay_ms: 100,
        }
    }

    pub fn commercial() -> Self {
        Self {
            name: "commercial".to_string(),
            providers: vec![
                ProviderKind::Wikimedia,
                ProviderKind::Unsplash,
                ProviderKind::Pixabay,
                ProviderKind::Pexels,
            ],
            acceptance_threshold: 0.3,
            tmdb_rules: ScoringRules::tmdb(),
            wikimedia: WikimediaSettings::commercial(),
            stock_confidence: StockConfidence::default(),
            avatar: AvatarStyle::commercial(),
            skip: SkipRule {
                trusted_sources: Vec::new(),
                license_markers: vec!["Commercial OK".to_string(), "commercial use".to_string()],
            },
            persist_fallback: true,
            batch_delay_ms: 200,
        }
    }

    /// Built-in profile by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "legal" => Some(Self::legal()),
            "commercial" => Some(Self::commercial()),
            _ => None,
        }
    }
}

impl Default for ResolverProfile {
    fn default() -> Self {
        Self::commercial()
    }
}
