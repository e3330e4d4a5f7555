//! Relationship mechanics: the closed set of relationship categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kinds of relationship two agents can have.
///
/// Declaration order (friend, neutral, enemy) is the canonical iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipCategory {
    /// The agents act as friends toward one another.
    Friend,
    /// The agents act neutrally toward one another. Not the same thing as a
    /// relationship nothing is known about.
    Neutral,
    /// The agents act as enemies toward one another.
    Enemy,
}

impl RelationshipCategory {
    /// All categories in declaration order.
    pub const ALL: [RelationshipCategory; 3] = [
        RelationshipCategory::Friend,
        RelationshipCategory::Neutral,
        RelationshipCategory::Enemy,
    ];

    /// Number of categories.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this category in declaration order.
    pub fn index(&self) -> usize {
        match self {
            RelationshipCategory::Friend => 0,
            RelationshipCategory::Neutral => 1,
            RelationshipCategory::Enemy => 2,
        }
    }

    /// Lowercase name, as used in prose and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            RelationshipCategory::Friend => "friend",
            RelationshipCategory::Neutral => "neutral",
            RelationshipCategory::Enemy => "enemy",
        }
    }

    /// Single-letter code used by the typicality knowledge format.
    pub fn letter(&self) -> char {
        match self {
            RelationshipCategory::Friend => 'F',
            RelationshipCategory::Neutral => 'N',
            RelationshipCategory::Enemy => 'E',
        }
    }

    /// Parse a single-letter code (`F`, `N`, `E`, any case).
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'F' => Some(RelationshipCategory::Friend),
            'N' => Some(RelationshipCategory::Neutral),
            'E' => Some(RelationshipCategory::Enemy),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelationshipCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no relationship category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown relationship category: {0:?}")]
pub struct ParseCategoryError(pub String);

impl std::str::FromStr for RelationshipCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_letter(c).ok_or_else(|| ParseCategoryError(s.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "friend" => Ok(RelationshipCategory::Friend),
            "neutral" => Ok(RelationshipCategory::Neutral),
            "enemy" => Ok(RelationshipCategory::Enemy),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}
