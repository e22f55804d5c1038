//! # CharacterVerse Common Library
//!
//! Shared code for the CharacterVerse services:
//! - Bootstrap configuration (TOML + root folder resolution)
//! - Database initialization and row models
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
