//! Keyword-based confidence scoring
//!
//! Every provider that scores its results feeds them through the same
//! additive rule table: each rule lists alternative matchers, and its weight
//! is applied once if any of them hits. The sum is clamped to [0, 1].
//!
//! Scores rank candidates within one resolution only. They are not
//! calibrated across providers and are never persisted.

use serde::{Deserialize, Serialize};

/// What a matcher looks for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// The character's name
    CharacterName,
    /// The universe's name
    Universe,
    /// `"{universe}:"`, as in franchise sub-titles
    UniverseHeading,
    /// A fixed word or phrase
    Keyword(String),
    /// Provider rating strictly above the value (text fields are ignored)
    RatingAbove(f64),
}

/// Which part of the result a matcher inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Snippet,
    /// Title or snippet
    Either,
    /// Title equal to the term
    WholeTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matcher {
    pub term: Term,
    pub field: Field,
}

impl Matcher {
    pub fn new(term: Term, field: Field) -> Self {
        Self { term, field }
    }

    pub fn keyword(word: &str, field: Field) -> Self {
        Self::new(Term::Keyword(word.to_string()), field)
    }
}

/// Signed weight applied once when any matcher hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub any_of: Vec<Matcher>,
    pub weight: f32,
}

impl KeywordRule {
    pub fn new(any_of: Vec<Matcher>, weight: f32) -> Self {
        Self { any_of, weight }
    }

    fn keywords(words: &[&str], field: Field, weight: f32) -> Self {
        Self::new(
            words.iter().map(|w| Matcher::keyword(w, field)).collect(),
            weight,
        )
    }
}

/// Who we are looking for
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub name: &'a str,
    pub universe: Option<&'a str>,
}

/// The text of one provider result
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoredText<'a> {
    pub title: &'a str,
    pub snippet: &'a str,
    pub rating: Option<f64>,
}

/// An ordered rule table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub rules: Vec<KeywordRule>,
}

impl ScoringRules {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Score one result; always within [0, 1]
    pub fn score(&self, ctx: &ScoringContext<'_>, text: &ScoredText<'_>) -> f32 {
        let lowered = Lowered::new(ctx, text);
        // Summed in f32: 0.2 + 0.1 lands exactly on 0.3, which a 0.3 threshold rejects
        let raw: f32 = self
            .rules
            .iter()
            .filter(|rule| rule.any_of.iter().any(|m| lowered.matches(m)))
            .map(|rule| rule.weight)
            .sum();
        clamp_confidence(raw)
    }

    /// Movie/TV search results
    pub fn tmdb() -> Self {
        use Field::*;
        Self::new(vec![
            KeywordRule::new(vec![Matcher::new(Term::Universe, Title)], 0.4),
            KeywordRule::new(vec![Matcher::new(Term::CharacterName, Title)], 0.3),
            KeywordRule::new(vec![Matcher::new(Term::CharacterName, Snippet)], 0.2),
            KeywordRule::new(
                vec![
                    Matcher::new(Term::Universe, WholeTitle),
                    Matcher::new(Term::UniverseHeading, Title),
                ],
                0.3,
            ),
            KeywordRule::new(vec![Matcher::new(Term::RatingAbove(7.0), Title)], 0.1),
        ])
    }

    /// Media-commons results when any free license is acceptable
    pub fn wikimedia_legal() -> Self {
        use Field::*;
        Self::new(vec![
            KeywordRule::new(vec![Matcher::new(Term::CharacterName, Title)], 0.4),
            KeywordRule::new(vec![Matcher::new(Term::CharacterName, Snippet)], 0.3),
            KeywordRule::keywords(&["character"], Either, 0.2),
            KeywordRule::keywords(&["illustration", "artwork"], Title, 0.1),
            KeywordRule::keywords(&["logo", "symbol"], Title, -0.3),
            KeywordRule::keywords(&["text", "diagram"], Title, -0.2),
        ])
    }

    /// Media-commons results that must be safe for commercial use
    pub fn wikimedia_commercial() -> Self {
        use Field::*;
        Self::new(vec![
            KeywordRule::keywords(&["public domain"], Either, 0.4),
            KeywordRule::keywords(&["cc0"], Either, 0.4),
            KeywordRule::new(vec![Matcher::new(Term::CharacterName, Title)], 0.3),
            KeywordRule::keywords(&["mythology", "literature"], Title, 0.2),
            KeywordRule::keywords(&["historical", "classic"], Title, 0.2),
            KeywordRule::keywords(&["copyright"], Either, -0.5),
            KeywordRule::keywords(&["©"], Either, -0.5),
            KeywordRule::keywords(&["trademark"], Either, -0.3),
        ])
    }
}

/// Clamp a raw sum into [0, 1]; NaN counts as no confidence
pub fn clamp_confidence(raw: f32) -> f32 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, 1.0)
    }
}

/// Lowercased copies of everything a matcher can compare
struct Lowered {
    title: String,
    snippet: String,
    name: String,
    universe: String,
    rating: Option<f64>,
}

impl Lowered {
    fn new(ctx: &ScoringContext<'_>, text: &ScoredText<'_>) -> Self {
        Self {
            title: text.title.to_lowercase(),
            snippet: text.snippet.to_lowercase(),
            name: ctx.name.trim().to_lowercase(),
            universe: ctx.universe.unwrap_or_default().trim().to_lowercase(),
            rating: text.rating,
        }
    }

    fn matches(&self, matcher: &Matcher) -> bool {
        let needle = match &matcher.term {
            Term::RatingAbove(threshold) => {
                return self.rating.is_some_and(|r| r > *threshold);
            }
            Term::CharacterName => self.name.clone(),
            Term::Universe => self.universe.clone(),
            Term::UniverseHeading if self.universe.is_empty() => String::new(),
            Term::UniverseHeading => format!("{}:", self.universe),
            Term::Keyword(word) => word.to_lowercase(),
        };

        // An empty needle would match everything
        if needle.is_empty() {
            return false;
        }

        match matcher.field {
            Field::Title => self.title.contains(&needle),
            Field::Snippet => self.snippet.contains(&needle),
            Field::Either => self.title.contains(&needle) || self.snippet.contains(&needle),
            Field::WholeTitle => self.title == needle,
        }
    }
}
