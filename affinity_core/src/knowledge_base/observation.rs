//! Per-action observation models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use story_world::RelationshipCategory;

use super::Distribution;
use crate::error::{AffinityError, Result};

/// How likely an action is to be observed under each relationship category.
///
/// Immutable once built; the probabilities always sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionObservationModel {
    distribution: Distribution,
}

impl ActionObservationModel {
    /// Build from a mapping that is already a probability distribution.
    pub fn from_probabilities(probabilities: &BTreeMap<RelationshipCategory, f64>) -> Result<Self> {
        Ok(Self {
            distribution: Distribution::from_probabilities(probabilities)?,
        })
    }

    /// Build from non-negative relative weights in declaration order
    /// (friend, neutral, enemy).
    pub fn from_weights(weights: [f64; RelationshipCategory::COUNT]) -> Result<Self> {
        Ok(Self {
            distribution: Distribution::from_weights(weights)?,
        })
    }

    /// Build from "is this action typical under category X?" flags.
    ///
    /// Typical categories get weight `ratio`, the rest weight 1, then the
    /// weights are normalized. Categories missing from the map count as not
    /// typical.
    pub fn from_typicality(
        typical: &BTreeMap<RelationshipCategory, bool>,
        ratio: f64,
    ) -> Result<Self> {
        let weights = typicality_weights(
            |c| typical.get(&c).copied().unwrap_or(false),
            ratio,
        )?;
        Self::from_weights(weights)
    }

    /// Build from the list of categories the action is typical under.
    pub fn typical_under(categories: &[RelationshipCategory], ratio: f64) -> Result<Self> {
        let weights = typicality_weights(|c| categories.contains(&c), ratio)?;
        Self::from_weights(weights)
    }

    /// Probability of observing this action under the given category.
    pub fn probability_given(&self, category: RelationshipCategory) -> f64 {
        self.distribution.get(category)
    }

    /// The underlying distribution.
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// Categories this action favors, i.e. those at the maximum probability.
    /// Empty when the action is equally likely under every category.
    pub fn favored_categories(&self) -> Vec<RelationshipCategory> {
        let (leading, _) = self.distribution.most_likely();
        if leading.len() == RelationshipCategory::COUNT {
            Vec::new()
        } else {
            leading
        }
    }
}

impl std::fmt::Display for ActionObservationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.distribution.to_concise_string())
    }
}

/// Weights for the boolean/ratio construction shared with biased beliefs.
pub(crate) fn typicality_weights<F>(
    is_typical: F,
    ratio: f64,
) -> Result<[f64; RelationshipCategory::COUNT]>
where
    F: Fn(RelationshipCategory) -> bool,
{
    if !ratio.is_finite() || ratio < 1.0 {
        return Err(AffinityError::InvalidRatio(ratio));
    }
    Ok(RelationshipCategory::ALL.map(|c| if is_typical(c) { ratio } else { 1.0 }))
}
