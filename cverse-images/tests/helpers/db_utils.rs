//! Database Test Utilities

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// In-memory database with the full schema
///
/// Single connection so every query sees the same in-memory database.
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();
    cverse_common::db::create_schema(&pool).await.unwrap();
    pool
}

pub async fn insert_universe(pool: &SqlitePool, id: &str, name: &str) {
    sqlx::query("INSERT INTO universes (id, name, slug) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(slugify(name))
        .execute(pool)
        .await
        .unwrap();
}

/// Character row; `image` is `(source, license)` of the stored image, if any
pub async fn insert_character(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    universe_id: &str,
    image: Option<(&str, &str)>,
) {
    sqlx::query(
        "INSERT INTO characters (id, name, slug, universe_id, image_url, image_source, image_license)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(slugify(name))
    .bind(universe_id)
    .bind(image.map(|_| format!("https://example.org/{}.png", id)))
    .bind(image.map(|(source, _)| source))
    .bind(image.map(|(_, license)| license))
    .execute(pool)
    .await
    .unwrap();
}

/// `(image_url, image_source, image_license, image_attribution)` of a character
pub async fn stored_image(
    pool: &SqlitePool,
    id: &str,
) -> (Option<String>, Option<String>, Option<String>, Option<String>) {
    sqlx::query_as(
        "SELECT image_url, image_source, image_license, image_attribution FROM characters WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}
