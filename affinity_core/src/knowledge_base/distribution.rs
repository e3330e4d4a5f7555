//! Distributions over relationship categories.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use story_world::RelationshipCategory;

use crate::error::{AffinityError, Result};

/// Tolerance for accepting a caller-supplied probability mapping as normalized.
pub const INPUT_SUM_TOLERANCE: f64 = 1e-6;

/// One probability per relationship category.
///
/// Values built through the constructors here are non-negative and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub friend: f64,
    pub neutral: f64,
    pub enemy: f64,
}

impl Distribution {
    /// The uniform distribution, `1/3` for every category.
    pub fn uniform() -> Self {
        let p = 1.0 / RelationshipCategory::COUNT as f64;
        Self {
            friend: p,
            neutral: p,
            enemy: p,
        }
    }

    /// Normalize non-negative relative weights into a distribution.
    pub fn from_weights(weights: [f64; RelationshipCategory::COUNT]) -> Result<Self> {
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(AffinityError::InvalidDistribution(format!(
                "weight {} is negative or not finite",
                bad
            )));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(AffinityError::InvalidDistribution(
                "weights sum to zero".to_string(),
            ));
        }
        Ok(Self::from_array(weights.map(|w| w / total)))
    }

    /// Accept a mapping that is already a probability distribution.
    ///
    /// Categories absent from the mapping get probability 0. The sum must be 1
    /// within [`INPUT_SUM_TOLERANCE`]; the result is renormalized exactly.
    pub fn from_probabilities(probabilities: &BTreeMap<RelationshipCategory, f64>) -> Result<Self> {
        let mut values = [0.0; RelationshipCategory::COUNT];
        for (category, p) in probabilities {
            values[category.index()] = *p;
        }
        let total: f64 = values.iter().sum();
        if (total - 1.0).abs() > INPUT_SUM_TOLERANCE {
            return Err(AffinityError::InvalidDistribution(format!(
                "probabilities sum to {} instead of 1",
                total
            )));
        }
        Self::from_weights(values)
    }

    /// Build a distribution from per-category probabilities in declaration order.
    pub(crate) fn from_array(values: [f64; RelationshipCategory::COUNT]) -> Self {
        Self {
            friend: values[0],
            neutral: values[1],
            enemy: values[2],
        }
    }

    /// Per-category probabilities in declaration order.
    pub fn to_array(&self) -> [f64; RelationshipCategory::COUNT] {
        [self.friend, self.neutral, self.enemy]
    }

    /// Probability of a category.
    pub fn get(&self, category: RelationshipCategory) -> f64 {
        match category {
            RelationshipCategory::Friend => self.friend,
            RelationshipCategory::Neutral => self.neutral,
            RelationshipCategory::Enemy => self.enemy,
        }
    }

    /// Iterate over `(category, probability)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (RelationshipCategory, f64)> + '_ {
        RelationshipCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Copy into an ordered map.
    pub fn to_map(&self) -> BTreeMap<RelationshipCategory, f64> {
        self.iter().collect()
    }

    /// Sum of all probabilities.
    pub fn total(&self) -> f64 {
        self.to_array().iter().sum()
    }

    /// L1 distance between two distributions.
    pub fn l1_distance(&self, other: &Distribution) -> f64 {
        self.iter()
            .map(|(c, p)| (p - other.get(c)).abs())
            .sum()
    }

    /// Expected value of `other` under this distribution: `Σ self(c) * other(c)`.
    pub fn dot(&self, other: &Distribution) -> f64 {
        self.iter().map(|(c, p)| p * other.get(c)).sum()
    }

    /// Check whether any category deviates from uniform by more than `tolerance`.
    pub fn deviates_from_uniform(&self, tolerance: f64) -> bool {
        let uniform = 1.0 / RelationshipCategory::COUNT as f64;
        self.iter().any(|(_, p)| (p - uniform).abs() > tolerance)
    }

    /// The highest probability and every category that attains it.
    pub fn most_likely(&self) -> (Vec<RelationshipCategory>, f64) {
        let max = self
            .iter()
            .map(|(_, p)| p)
            .fold(f64::NEG_INFINITY, f64::max);
        let leading = self
            .iter()
            .filter(|(_, p)| *p == max)
            .map(|(c, _)| c)
            .collect();
        (leading, max)
    }

    /// Short `F|N|E` percentage rendering, e.g. `60%|20%|20%`.
    pub fn to_concise_string(&self) -> String {
        self.iter()
            .map(|(_, p)| format!("{:02.0}%", p * 100.0))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::uniform()
    }
}
