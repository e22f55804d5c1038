//! Batch image update
//!
//! Walks every stored character once, sequentially, resolving and persisting
//! one image each. Characters whose stored image already satisfies the
//! profile's skip rule are left alone without any provider call. A fixed
//! pause follows every character that went through resolution.

use crate::db::CharacterStore;
use crate::resolver::ImageResolver;
use crate::types::CharacterQuery;
use cverse_common::db::Character;
use cverse_common::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Counters for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub updated: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchStats {
    /// Characters processed (every character returned by the store)
    pub fn total(&self) -> usize {
        self.updated + self.failed + self.skipped
    }

    fn record(&mut self, outcome: &UpdateOutcome) {
        match outcome {
            UpdateOutcome::Updated => self.updated += 1,
            UpdateOutcome::Failed(_) => self.failed += 1,
            UpdateOutcome::Skipped | UpdateOutcome::KeptFallback => self.skipped += 1,
        }
    }
}

/// What happened to a single character
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// A new image was written
    Updated,
    /// Stored image already acceptable; nothing resolved
    Skipped,
    /// Only the fallback avatar qualified and the profile does not persist it
    KeptFallback,
    /// Resolution or persistence failed
    Failed(String),
}

impl UpdateOutcome {
    /// Whether provider calls were made for this character
    fn was_resolved(&self) -> bool {
        !matches!(self, UpdateOutcome::Skipped)
    }
}

/// Resolve and store one character's image
pub async fn update_character(
    resolver: &ImageResolver,
    store: &dyn CharacterStore,
    character: &Character,
) -> UpdateOutcome {
    let profile = resolver.profile();
    if profile.skip.should_skip(character) {
        return UpdateOutcome::Skipped;
    }

    let image = resolver.resolve(&CharacterQuery::from(character)).await;

    if image.source.is_generated() && !profile.persist_fallback {
        return UpdateOutcome::KeptFallback;
    }

    match store.update_image(&character.id, &image.to_metadata()).await {
        Ok(()) => UpdateOutcome::Updated,
        Err(e) => UpdateOutcome::Failed(e.to_string()),
    }
}

/// Run the batch over every stored character
///
/// Only a failure to list characters aborts the run; per-character failures
/// are counted and the run continues.
pub async fn update_all(resolver: &ImageResolver, store: &dyn CharacterStore) -> Result<BatchStats> {
    let characters = store.find_all().await?;
    let delay = Duration::from_millis(resolver.profile().batch_delay_ms);
    let mut stats = BatchStats::default();

    info!(
        profile = %resolver.profile().name,
        characters = characters.len(),
        "Starting batch image update"
    );

    for character in &characters {
        let outcome = update_character(resolver, store, character).await;

        match &outcome {
            UpdateOutcome::Updated => info!(character = %character.name, "Updated image"),
            UpdateOutcome::Skipped => {
                info!(character = %character.name, "Skipping, image already acceptable")
            }
            UpdateOutcome::KeptFallback => {
                info!(character = %character.name, "No suitable image found, keeping current")
            }
            UpdateOutcome::Failed(error) => {
                warn!(character = %character.name, error = %error, "Image update failed")
            }
        }

        stats.record(&outcome);

        if outcome.was_resolved() && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    info!(
        updated = stats.updated,
        failed = stats.failed,
        skipped = stats.skipped,
        "Batch image update complete"
    );

    Ok(stats)
}
