//! Core types shared by providers, scoring, the resolver and the batch driver

use cverse_common::db::{Character, ImageMetadata};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a candidate image came from
///
/// The string forms are what gets persisted in `characters.image_source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSource {
    #[serde(rename = "TMDB")]
    Tmdb,
    Wikimedia,
    Unsplash,
    Pixabay,
    Pexels,
    #[serde(rename = "UI_Avatars")]
    UiAvatars,
    Generated,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::Tmdb => "TMDB",
            ImageSource::Wikimedia => "Wikimedia",
            ImageSource::Unsplash => "Unsplash",
            ImageSource::Pixabay => "Pixabay",
            ImageSource::Pexels => "Pexels",
            ImageSource::UiAvatars => "UI_Avatars",
            ImageSource::Generated => "Generated",
        }
    }

    /// True for tags produced by the avatar generator rather than a search
    pub fn is_generated(&self) -> bool {
        matches!(self, ImageSource::UiAvatars | ImageSource::Generated)
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate portrait, alive only for the duration of a resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateImage {
    pub url: String,
    pub source: ImageSource,
    pub license: String,
    pub attribution: String,
    /// Relevance estimate in [0, 1], comparable only within one resolution
    pub confidence: f32,
    pub width: u32,
    pub height: u32,
}

impl CandidateImage {
    /// The metadata written to the character when this candidate wins
    pub fn to_metadata(&self) -> ImageMetadata {
        ImageMetadata {
            url: Some(self.url.clone()),
            source: Some(self.source.as_str().to_string()),
            license: Some(self.license.clone()),
            attribution: Some(self.attribution.clone()),
        }
    }
}

/// Provider input derived from a character record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterQuery {
    pub name: String,
    pub universe: Option<String>,
    pub species: Option<String>,
    pub description: Option<String>,
}

impl CharacterQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_universe(mut self, universe: impl Into<String>) -> Self {
        self.universe = Some(universe.into());
        self
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    /// Universe name, if present and not blank
    pub fn universe_name(&self) -> Option<&str> {
        non_blank(self.universe.as_deref())
    }

    /// Species, if present and not blank
    pub fn species_name(&self) -> Option<&str> {
        non_blank(self.species.as_deref())
    }
}

impl From<&Character> for CharacterQuery {
    fn from(character: &Character) -> Self {
        Self {
            name: character.name.clone(),
            universe: character.universe.clone(),
            species: character.species.clone(),
            description: character.description.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
