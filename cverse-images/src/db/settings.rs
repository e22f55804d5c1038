//! Settings database operations
//!
//! Key-value accessors over the `settings` table. Provider API keys are
//! stored as `{provider}_api_key`.

use crate::providers::ProviderKind;
use cverse_common::{Error, Result};
use sqlx::{Pool, Sqlite};

fn provider_key_name(kind: ProviderKind) -> String {
    format!("{}_api_key", kind.as_str())
}

/// Stored API key for a provider, if any
pub async fn get_provider_api_key(db: &Pool<Sqlite>, kind: ProviderKind) -> Result<Option<String>> {
    get_setting(db, &provider_key_name(kind)).await
}

/// Store (or replace) the API key for a provider
pub async fn set_provider_api_key(db: &Pool<Sqlite>, kind: ProviderKind, key: String) -> Result<()> {
    set_setting(db, &provider_key_name(kind), key).await
}

/// Generic setting getter
pub async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(Option<String>,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    match row.and_then(|(value,)| value) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("Parse setting '{}' failed: {}", key, e))),
        None => Ok(None),
    }
}

/// Generic setting setter (upsert)
pub async fn set_setting<T>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}
