//! Deterministic generated avatars
//!
//! The fallback portrait for a character is a templated ui-avatars URL built
//! from the name's initials and a palette color chosen by name length. Same
//! name and style, same URL.

use crate::types::{CandidateImage, ImageSource};
use serde::{Deserialize, Serialize};

const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";
const AVATAR_SIZE: u32 = 500;

/// Background/foreground pair as 6-digit hex without `#`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub name: String,
    pub background: String,
    pub foreground: String,
}

impl ColorPair {
    fn new(name: &str, background: &str) -> Self {
        Self {
            name: name.to_string(),
            background: background.to_string(),
            foreground: "ffffff".to_string(),
        }
    }
}

/// How generated avatars look and how they are labelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarStyle {
    pub source: ImageSource,
    pub license: String,
    pub attribution: String,
    /// Fixed confidence so the avatar can compete with searched candidates
    pub confidence: f32,
    pub rounded: bool,
    pub palette: Vec<ColorPair>,
}

impl AvatarStyle {
    /// Bright palette, low confidence; only used when nothing else qualifies
    pub fn legal() -> Self {
        Self {
            source: ImageSource::UiAvatars,
            license: "Free".to_string(),
            attribution: "Generated Avatar".to_string(),
            confidence: 0.1,
            rounded: false,
            palette: vec![
                ColorPair::new("Red", "dc2626"),
                ColorPair::new("Blue", "2563eb"),
                ColorPair::new("Green", "059669"),
                ColorPair::new("Brown", "7c2d12"),
                ColorPair::new("Indigo", "4338ca"),
                ColorPair::new("Rose", "be123c"),
            ],
        }
    }

    /// Muted palette, high confidence, explicitly cleared for commercial use
    pub fn commercial() -> Self {
        Self {
            source: ImageSource::Generated,
            license: "Generated Avatar (Commercial OK)".to_string(),
            attribution: "Generated Avatar - No attribution required".to_string(),
            confidence: 0.9,
            rounded: true,
            palette: vec![
                ColorPair::new("Gray", "1f2937"),
                ColorPair::new("Dark gray", "374151"),
                ColorPair::new("Indigo", "4338ca"),
                ColorPair::new("Cyan", "0891b2"),
                ColorPair::new("Emerald", "059669"),
                ColorPair::new("Red", "dc2626"),
            ],
        }
    }
}

/// Up to two uppercase initials.
///
/// Tokens are split on whitespace and hyphens, so "Spider-Man" gives "SM".
pub fn initials(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-')
        .filter_map(|token| token.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// The fallback avatar for `name`
pub fn generate_avatar(name: &str, style: &AvatarStyle) -> CandidateImage {
    let index = palette_index(name, style.palette.len());
    match style.palette.get(index) {
        Some(color) => avatar_with_color(name, style, color),
        None => avatar_with_color(name, style, &ColorPair::new("Gray", "1f2937")),
    }
}

/// One avatar per palette color, for manual selection
pub fn avatar_options(name: &str, style: &AvatarStyle) -> Vec<CandidateImage> {
    style
        .palette
        .iter()
        .map(|color| {
            let mut avatar = avatar_with_color(name, style, color);
            avatar.attribution = format!("{} Avatar - {}", color.name, style.attribution);
            avatar
        })
        .collect()
}

fn palette_index(name: &str, palette_len: usize) -> usize {
    if palette_len == 0 {
        return 0;
    }
    name.chars().count() % palette_len
}

fn avatar_with_color(name: &str, style: &AvatarStyle, color: &ColorPair) -> CandidateImage {
    let mut url = format!(
        "{}?name={}&size={}&background={}&color={}&bold=true&format=png&font-size=0.4",
        AVATAR_BASE_URL,
        urlencoding::encode(&initials(name)),
        AVATAR_SIZE,
        color.background,
        color.foreground,
    );
    if style.rounded {
        url.push_str("&rounded=true");
    }

    CandidateImage {
        url,
        source: style.source,
        license: style.license.clone(),
        attribution: style.attribution.clone(),
        confidence: style.confidence,
        width: AVATAR_SIZE,
        height: AVATAR_SIZE,
    }
}
