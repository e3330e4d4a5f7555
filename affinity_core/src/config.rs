//! Configuration loading for the reasoner.
//!
//! Every tunable constant of the inference engine lives here and can be loaded
//! from a TOML file. Missing sections fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use story_world::RelationshipCategory;

use crate::error::{AffinityError, Result};
use crate::knowledge_base::ActionKnowledgeBase;
use crate::world_model::{RelationshipBelief, DEFAULT_INFORMATIVE_TOLERANCE};

/// Complete reasoner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AffinityConfig {
    /// World model settings
    #[serde(default)]
    pub world: WorldModelConfig,
    /// Action knowledge settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

impl AffinityConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        RelationshipBelief::with_ranked_preference(&self.world.default_bias_order)?;
        let ratio = self.knowledge.typicality_ratio;
        if !ratio.is_finite() || ratio < 1.0 {
            return Err(AffinityError::InvalidRatio(ratio));
        }
        let world = &self.world;
        if !world.informative_tolerance.is_finite() || world.informative_tolerance < 0.0 {
            return Err(invalid(
                "world.informative_tolerance",
                world.informative_tolerance,
                "must be finite and non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&world.unknown_pair_probability) {
            return Err(invalid(
                "world.unknown_pair_probability",
                world.unknown_pair_probability,
                "must be a probability in [0, 1]",
            ));
        }
        if !world.shared_pair_reward.is_finite() {
            return Err(invalid(
                "world.shared_pair_reward",
                world.shared_pair_reward,
                "must be finite",
            ));
        }
        Ok(())
    }

    /// The knowledge base declared inline under `[knowledge.actions]`.
    pub fn knowledge_base(&self) -> Result<ActionKnowledgeBase> {
        ActionKnowledgeBase::from_typical_categories(
            &self.knowledge.actions,
            self.knowledge.typicality_ratio,
        )
    }
}

/// World model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldModelConfig {
    /// Categories in increasing order of assumed likelihood, imposed on
    /// uninformative relationships during reflection
    pub default_bias_order: Vec<RelationshipCategory>,
    /// Subtracted from the divergence per pair two models share
    pub shared_pair_reward: f64,
    /// Probability reported for events between agents with no belief
    pub unknown_pair_probability: f64,
    /// Starting value of the update counter; update weights are `age + 1`
    pub initial_age: u64,
    /// Keep per-pair belief snapshots
    pub record_history: bool,
    /// Deviation from uniform above which a belief survives reflection
    pub informative_tolerance: f64,
}

impl Default for WorldModelConfig {
    fn default() -> Self {
        Self {
            default_bias_order: vec![
                RelationshipCategory::Enemy,
                RelationshipCategory::Friend,
                RelationshipCategory::Neutral,
            ],
            shared_pair_reward: 0.01,
            unknown_pair_probability: 1.0,
            initial_age: 0,
            record_history: true,
            informative_tolerance: DEFAULT_INFORMATIVE_TOLERANCE,
        }
    }
}

/// Action knowledge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Weight of a typical category relative to an atypical one
    pub typicality_ratio: f64,
    /// Inline knowledge: action -> categories it is typical under
    pub actions: BTreeMap<String, Vec<RelationshipCategory>>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            typicality_ratio: 2.0,
            actions: BTreeMap::new(),
        }
    }
}

fn invalid(setting: &str, value: f64, reason: &str) -> AffinityError {
    AffinityError::InvalidSetting {
        setting: setting.to_string(),
        reason: format!("{} {}", value, reason),
    }
}

/// Returns a default configuration as a TOML string.
pub fn default_config_toml() -> Result<String> {
    AffinityConfig::default().to_toml()
}
