//! Shared error type for the CharacterVerse crates

use thiserror::Error;

/// Result alias used by storage and configuration code
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by storage, configuration and bootstrap code
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure (root folder, config file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML bootstrap file
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing or invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// No character (or other record) with the requested id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller supplied a value that cannot be accepted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}
