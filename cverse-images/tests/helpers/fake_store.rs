//! In-memory collaborators for resolver and batch tests

use async_trait::async_trait;
use cverse_common::db::{Character, ImageMetadata};
use cverse_common::{Error, Result};
use cverse_images::db::CharacterStore;
use cverse_images::providers::ImageProvider;
use cverse_images::types::{CandidateImage, CharacterQuery, ImageSource};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn character(id: &str, name: &str, universe: Option<&str>) -> Character {
    Character {
        id: id.to_string(),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        universe: universe.map(str::to_string),
        species: None,
        description: None,
        image_url: None,
        image_source: None,
        image_license: None,
        image_attribution: None,
    }
}

pub fn with_image(mut character: Character, source: &str, license: &str) -> Character {
    character.image_url = Some(format!("https://example.org/{}.png", character.id));
    character.image_source = Some(source.to_string());
    character.image_license = Some(license.to_string());
    character
}

#[derive(Default)]
pub struct MemoryStore {
    characters: Mutex<Vec<Character>>,
    failing_updates: HashSet<String>,
    fail_find_all: bool,
    updates: Mutex<Vec<(String, ImageMetadata)>>,
}

impl MemoryStore {
    pub fn new(characters: Vec<Character>) -> Self {
        Self {
            characters: Mutex::new(characters),
            ..Self::default()
        }
    }

    /// Store whose `find_all` always fails
    pub fn unavailable() -> Self {
        Self {
            fail_find_all: true,
            ..Self::default()
        }
    }

    /// `update_image` fails for these ids
    pub fn failing_updates_for(mut self, ids: &[&str]) -> Self {
        self.failing_updates = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn updates(&self) -> Vec<(String, ImageMetadata)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl CharacterStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Character>> {
        if self.fail_find_all {
            return Err(Error::Internal("storage unavailable".to_string()));
        }
        Ok(self.characters.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Character>> {
        Ok(self
            .characters
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn update_image(&self, id: &str, image: &ImageMetadata) -> Result<()> {
        if self.failing_updates.contains(id) {
            return Err(Error::Internal(format!("write failed for {}", id)));
        }
        let mut characters = self.characters.lock().unwrap();
        let character = characters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        character.image_url = image.url.clone();
        character.image_source = image.source.clone();
        character.image_license = image.license.clone();
        character.image_attribution = image.attribution.clone();
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), image.clone()));
        Ok(())
    }
}

/// Provider returning fixed candidates and counting its calls
pub struct FixedProvider {
    source: ImageSource,
    candidates: Vec<CandidateImage>,
    calls: Arc<AtomicUsize>,
}

impl FixedProvider {
    pub fn new(source: ImageSource, candidates: Vec<CandidateImage>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                source,
                candidates,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl ImageProvider for FixedProvider {
    fn source(&self) -> ImageSource {
        self.source
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn search(&self, _query: &CharacterQuery) -> Vec<CandidateImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.candidates.clone()
    }
}

pub fn candidate(source: ImageSource, url: &str, confidence: f32) -> CandidateImage {
    CandidateImage {
        url: url.to_string(),
        source,
        license: format!("{} license", source),
        attribution: format!("{} attribution", source),
        confidence,
        width: 500,
        height: 500,
    }
}
