//! Character storage collaborator
//!
//! The resolver and batch driver only see [`CharacterStore`]; the SQLite
//! implementation joins the universe name onto each row.

use async_trait::async_trait;
use cverse_common::db::{Character, ImageMetadata};
use cverse_common::{Error, Result};
use sqlx::SqlitePool;

#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Every stored character, ordered by name
    async fn find_all(&self) -> Result<Vec<Character>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Character>>;

    /// Overwrite the four image fields; `NotFound` when no row has `id`
    async fn update_image(&self, id: &str, image: &ImageMetadata) -> Result<()>;
}

const SELECT_CHARACTER: &str = r#"
    SELECT c.id, c.name, c.slug, u.name AS universe, c.species, c.description,
           c.image_url, c.image_source, c.image_license, c.image_attribution
    FROM characters c
    LEFT JOIN universes u ON u.id = c.universe_id
"#;

#[derive(Clone)]
pub struct SqliteCharacterStore {
    pool: SqlitePool,
}

impl SqliteCharacterStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CharacterStore for SqliteCharacterStore {
    async fn find_all(&self) -> Result<Vec<Character>> {
        let sql = format!("{} ORDER BY c.name", SELECT_CHARACTER);
        let characters = sqlx::query_as::<_, Character>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(characters)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Character>> {
        let sql = format!("{} WHERE c.id = ?", SELECT_CHARACTER);
        let character = sqlx::query_as::<_, Character>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(character)
    }

    async fn update_image(&self, id: &str, image: &ImageMetadata) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE characters
            SET image_url = ?, image_source = ?, image_license = ?, image_attribution = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(&image.url)
        .bind(&image.source)
        .bind(&image.license)
        .bind(&image.attribution)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Character {}", id)));
        }
        Ok(())
    }
}
