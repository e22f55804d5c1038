//! Database row models

use serde::{Deserialize, Serialize};

/// Character row joined with its universe name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub universe: Option<String>,
    pub species: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_source: Option<String>,
    pub image_license: Option<String>,
    pub image_attribution: Option<String>,
}

/// The four image columns written back after a resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub url: Option<String>,
    pub source: Option<String>,
    pub license: Option<String>,
    pub attribution: Option<String>,
}
