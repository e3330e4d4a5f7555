//! Belief about the relationship within one pair of agents.

use serde::{Deserialize, Serialize};

use story_world::RelationshipCategory;

use crate::error::{AffinityError, Result};
use crate::knowledge_base::{typicality_weights, ActionObservationModel, Distribution};

/// Default tolerance for telling a belief apart from the uniform prior.
pub const DEFAULT_INFORMATIVE_TOLERANCE: f64 = 0.001;

/// Current belief about which relationship category a pair is in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipBelief {
    distribution: Distribution,
}

impl RelationshipBelief {
    /// An uninformed belief: uniform over all categories.
    pub fn new() -> Self {
        Self {
            distribution: Distribution::uniform(),
        }
    }

    /// A belief that `category` is `ratio` times as likely as each other
    /// category.
    pub fn with_preference(category: RelationshipCategory, ratio: f64) -> Result<Self> {
        let weights = typicality_weights(|c| c == category, ratio)?;
        Ok(Self {
            distribution: Distribution::from_weights(weights)?,
        })
    }

    /// A belief that the categories in `order` are in increasing order of
    /// likelihood: the first gets weight 1, the next 2, and so on.
    ///
    /// `order` must list every category exactly once.
    pub fn with_ranked_preference(order: &[RelationshipCategory]) -> Result<Self> {
        validate_order(order)?;
        let mut weights = [0.0; RelationshipCategory::COUNT];
        for (rank, category) in order.iter().enumerate() {
            weights[category.index()] = (rank + 1) as f64;
        }
        Ok(Self {
            distribution: Distribution::from_weights(weights)?,
        })
    }

    /// Wrap an existing distribution.
    pub fn from_distribution(distribution: Distribution) -> Self {
        Self { distribution }
    }

    /// Bayesian update: multiply each category by `P(action | category)^weight`
    /// and renormalize.
    ///
    /// Done in log space so large weights cannot underflow every category to
    /// zero. If no category keeps any mass the belief is left unchanged.
    pub fn update(&mut self, observation: &ActionObservationModel, weight: f64) {
        let logs = RelationshipCategory::ALL.map(|c| {
            let prior = self.distribution.get(c);
            let likelihood = observation.probability_given(c);
            if prior <= 0.0 {
                f64::NEG_INFINITY
            } else if weight == 0.0 {
                prior.ln()
            } else if likelihood <= 0.0 {
                f64::NEG_INFINITY
            } else {
                prior.ln() + weight * likelihood.ln()
            }
        });

        let max = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            tracing::warn!(
                observation = %observation,
                weight,
                "observation rules out every category; belief left unchanged"
            );
            return;
        }

        let weights = logs.map(|l| if l.is_finite() { (l - max).exp() } else { 0.0 });
        match Distribution::from_weights(weights) {
            Ok(distribution) => self.distribution = distribution,
            Err(e) => tracing::warn!(error = %e, "degenerate belief update skipped"),
        }
    }

    /// Predictive probability of observing the action under this belief:
    /// `Σ belief(c) * P(action | c)`.
    pub fn probability_of_observation(&self, observation: &ActionObservationModel) -> f64 {
        self.distribution.dot(observation.distribution())
    }

    /// L1 distance to another belief.
    pub fn divergence_from(&self, other: &RelationshipBelief) -> f64 {
        self.distribution.l1_distance(&other.distribution)
    }

    /// Check whether anything has been learned, using the default tolerance.
    pub fn is_informative(&self) -> bool {
        self.is_informative_within(DEFAULT_INFORMATIVE_TOLERANCE)
    }

    /// Check whether any category deviates from uniform by more than `tolerance`.
    pub fn is_informative_within(&self, tolerance: f64) -> bool {
        self.distribution.deviates_from_uniform(tolerance)
    }

    /// Probability currently assigned to a category.
    pub fn probability_of(&self, category: RelationshipCategory) -> f64 {
        self.distribution.get(category)
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// Most believed categories (ties included) and the confidence in them.
    pub fn summary(&self) -> BeliefSummary {
        let (leading, confidence) = self.distribution.most_likely();
        BeliefSummary {
            leading,
            confidence,
        }
    }
}

impl Default for RelationshipBelief {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RelationshipBelief {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.distribution.to_concise_string())
    }
}

/// The most believed relationship categories and the confidence in them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefSummary {
    /// Every category at the maximum probability, in declaration order.
    pub leading: Vec<RelationshipCategory>,
    pub confidence: f64,
}

impl BeliefSummary {
    /// The single most believed category, or `None` on a tie.
    pub fn decided(&self) -> Option<RelationshipCategory> {
        match self.leading.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

impl std::fmt::Display for BeliefSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.leading.iter().map(|c| c.name()).collect();
        write!(f, "{} ({:.0}%)", names.join(" or "), self.confidence * 100.0)
    }
}

fn validate_order(order: &[RelationshipCategory]) -> Result<()> {
    let complete = order.len() == RelationshipCategory::COUNT
        && RelationshipCategory::ALL.iter().all(|c| order.contains(c));
    if complete {
        Ok(())
    } else {
        Err(AffinityError::InvalidBiasOrder(order.to_vec()))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn observation() -> impl Strategy<Value = ActionObservationModel> {
        (0.01f64..1.0, 0.01f64..1.0, 0.01f64..1.0)
            .prop_map(|(f, n, e)| ActionObservationModel::from_weights([f, n, e]).unwrap())
    }

    proptest! {
        /// Property: beliefs stay normalized and non-negative after any update
        #[test]
        fn test_update_keeps_belief_normalized(obs in observation(), weight in 0.0f64..50.0) {
            let mut belief = RelationshipBelief::new();
            belief.update(&obs, weight);

            prop_assert!((belief.distribution().total() - 1.0).abs() < 1e-9);
            prop_assert!(belief.distribution().iter().all(|(_, p)| p >= 0.0));
        }

        /// Property: a weight-w update equals w unit updates
        #[test]
        fn test_weight_is_repetition(obs in observation(), weight in 1u32..12) {
            let mut weighted = RelationshipBelief::new();
            weighted.update(&obs, weight as f64);

            let mut repeated = RelationshipBelief::new();
            for _ in 0..weight {
                repeated.update(&obs, 1.0);
            }

            prop_assert!(weighted.divergence_from(&repeated) < 1e-9);
        }

        /// Property: ratio-biased beliefs are normalized
        #[test]
        fn test_preference_normalized(ratio in 1.0f64..100.0, idx in 0usize..3) {
            let belief = RelationshipBelief::with_preference(RelationshipCategory::ALL[idx], ratio).unwrap();
            prop_assert!((belief.distribution().total() - 1.0).abs() < 1e-9);
        }
    }
}
