//! Database access for the image resolver

pub mod characters;
pub mod settings;

pub use characters::{CharacterStore, SqliteCharacterStore};
