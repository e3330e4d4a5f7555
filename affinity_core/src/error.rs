//! Error types for affinity operations.

use thiserror::Error;

use story_world::RelationshipCategory;

/// Errors that can occur while building knowledge or interpreting stories.
#[derive(Error, Debug)]
pub enum AffinityError {
    /// An action was read that the knowledge base has no observation model for.
    #[error("Insufficient knowledge about \"{action}\" to continue")]
    InsufficientKnowledge { action: String },

    /// A typicality ratio below 1 or not finite.
    #[error("Invalid typicality ratio: {0} (must be finite and >= 1)")]
    InvalidRatio(f64),

    /// A probability mapping that is negative, not finite, or not normalized.
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// A ranked preference that is not a permutation of all categories.
    #[error("Invalid bias order {0:?}: must list every relationship category exactly once")]
    InvalidBiasOrder(Vec<RelationshipCategory>),

    /// A task answer pointing past the available choices.
    #[error("Task {task}: answer index {answer} is out of range")]
    InvalidChoiceIndex { task: u32, answer: usize },

    /// A malformed line in a typicality knowledge file.
    #[error("Knowledge parse error on line {line}: {reason}")]
    KnowledgeParse { line: usize, reason: String },

    /// A configuration value outside its valid range.
    #[error("Invalid setting {setting}: {reason}")]
    InvalidSetting { setting: String, reason: String },

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("Configuration serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AffinityError>;

impl AffinityError {
    /// The action that lacked knowledge, if this is a knowledge error.
    pub fn missing_action(&self) -> Option<&str> {
        match self {
            AffinityError::InsufficientKnowledge { action } => Some(action),
            _ => None,
        }
    }
}
