//! World model - beliefs about every relationship in one scenario.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use story_world::{AgentId, AgentPair, ResolvedEvent};

use super::{BeliefSummary, RelationshipBelief};
use crate::config::WorldModelConfig;
use crate::error::Result;
use crate::knowledge_base::{ActionObservationModel, Distribution};

/// Snapshots of one pair's belief, keyed by the update index they were taken at.
pub type BeliefTimeline = BTreeMap<u64, Distribution>;

/// One row of belief history, flattened for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub pair: AgentPair,
    pub step: u64,
    pub beliefs: Distribution,
}

/// Tracks a belief per unordered pair of agents as resolved events stream in.
///
/// Pairs are created eagerly: the moment an agent first appears it is paired
/// with every agent already known, so any pair of known agents has a belief.
/// Later evidence is weighted more heavily: the n-th update (counting from
/// `initial_age`) is applied with weight `age + 1`.
#[derive(Debug, Clone)]
pub struct WorldModel {
    config: WorldModelConfig,

    /// Known agents in order of first appearance.
    agents: Vec<AgentId>,

    /// Current belief per pair.
    beliefs: BTreeMap<AgentPair, RelationshipBelief>,

    /// Belief snapshots per pair.
    history: BTreeMap<AgentPair, BeliefTimeline>,

    /// Number of updates applied so far, offset by `initial_age`.
    age: u64,
}

impl WorldModel {
    /// Create a world model containing no information.
    pub fn new(config: WorldModelConfig) -> Self {
        let age = config.initial_age;
        Self {
            config,
            agents: Vec::new(),
            beliefs: BTreeMap::new(),
            history: BTreeMap::new(),
            age,
        }
    }

    /// Create a world model with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(WorldModelConfig::default())
    }

    /// Apply a resolved event's evidence to the belief about its participants.
    pub fn update(&mut self, event: &ResolvedEvent, observation: &ActionObservationModel) {
        self.introduce(&event.actor);
        self.introduce(&event.acted_upon);

        let pair = event.pair();
        let weight = (self.age + 1) as f64;
        let belief = self.beliefs.entry(pair.clone()).or_default();
        belief.update(observation, weight);
        let snapshot = *belief.distribution();

        tracing::debug!(
            event = %event,
            age = self.age,
            weight,
            beliefs = %snapshot.to_concise_string(),
            "world model updated"
        );

        self.record(pair, snapshot);
        self.age += 1;
    }

    /// Replace every uninformative belief with the default ranked bias.
    ///
    /// Each rewrite is recorded in history and advances the age. Returns how
    /// many pairs were rewritten.
    pub fn reflect_and_refine(&mut self) -> Result<usize> {
        let default_belief =
            RelationshipBelief::with_ranked_preference(&self.config.default_bias_order)?;
        let tolerance = self.config.informative_tolerance;

        let uninformative: Vec<AgentPair> = self
            .beliefs
            .iter()
            .filter(|(_, belief)| !belief.is_informative_within(tolerance))
            .map(|(pair, _)| pair.clone())
            .collect();

        for pair in &uninformative {
            self.beliefs.insert(pair.clone(), default_belief);
            self.record(pair.clone(), *default_belief.distribution());
            self.age += 1;
        }

        tracing::info!(
            rewritten = uninformative.len(),
            pairs = self.beliefs.len(),
            "reflected on world model"
        );
        Ok(uninformative.len())
    }

    /// Predictive probability of observing the event under current beliefs.
    ///
    /// Pairs with no belief impose no penalty and get the configured
    /// unknown-pair probability (1 by default).
    pub fn probability_of(&self, event: &ResolvedEvent, observation: &ActionObservationModel) -> f64 {
        self.beliefs
            .get(&event.pair())
            .map(|belief| belief.probability_of_observation(observation))
            .unwrap_or(self.config.unknown_pair_probability)
    }

    /// Distance between two world models over the pairs both track, with a
    /// small reward per shared pair.
    pub fn divergence_from(&self, other: &WorldModel) -> f64 {
        self.beliefs
            .iter()
            .filter_map(|(pair, belief)| other.beliefs.get(pair).map(|o| belief.divergence_from(o)))
            .map(|distance| distance - self.config.shared_pair_reward)
            .sum()
    }

    /// Current belief distribution for a pair; uniform if the pair is unknown.
    pub fn beliefs_for(&self, pair: &AgentPair) -> Distribution {
        self.beliefs
            .get(pair)
            .map(|belief| *belief.distribution())
            .unwrap_or_default()
    }

    /// The belief for a pair, if tracked.
    pub fn belief(&self, pair: &AgentPair) -> Option<&RelationshipBelief> {
        self.beliefs.get(pair)
    }

    /// Most believed category and confidence for a pair.
    pub fn summary_for(&self, pair: &AgentPair) -> BeliefSummary {
        self.beliefs
            .get(pair)
            .copied()
            .unwrap_or_default()
            .summary()
    }

    /// One `A & B: friend (75%)` line per tracked pair.
    pub fn summary_report(&self) -> String {
        self.beliefs
            .iter()
            .map(|(pair, belief)| format!("{}: {}", pair, belief.summary()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Known agents in order of first appearance.
    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    /// Check if an agent has appeared in any update.
    pub fn knows_agent(&self, agent: &AgentId) -> bool {
        self.agents.contains(agent)
    }

    /// All tracked pairs in pair order.
    pub fn pairs(&self) -> impl Iterator<Item = &AgentPair> {
        self.beliefs.keys()
    }

    /// Iterate over tracked pairs and their beliefs.
    pub fn iter_beliefs(&self) -> impl Iterator<Item = (&AgentPair, &RelationshipBelief)> {
        self.beliefs.iter()
    }

    /// Number of tracked pairs.
    pub fn pair_count(&self) -> usize {
        self.beliefs.len()
    }

    /// The update counter.
    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn config(&self) -> &WorldModelConfig {
        &self.config
    }

    /// Belief snapshots for every pair.
    pub fn history(&self) -> &BTreeMap<AgentPair, BeliefTimeline> {
        &self.history
    }

    /// Belief snapshots for one pair.
    pub fn history_for(&self, pair: &AgentPair) -> Option<&BeliefTimeline> {
        self.history.get(pair)
    }

    /// History flattened into rows ordered by pair, then step.
    pub fn history_records(&self) -> Vec<HistoryRecord> {
        self.history
            .iter()
            .flat_map(|(pair, timeline)| {
                timeline.iter().map(move |(step, beliefs)| HistoryRecord {
                    pair: pair.clone(),
                    step: *step,
                    beliefs: *beliefs,
                })
            })
            .collect()
    }

    /// History as a JSON array of [`HistoryRecord`]s.
    pub fn history_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.history_records())?)
    }

    /// Concise listing of every pair's belief, e.g. `Alice & Bob:60%|20%|20%`.
    pub fn to_concise_string(&self) -> String {
        self.beliefs
            .iter()
            .map(|(pair, belief)| format!("{}:{}", pair, belief))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Add an agent, pairing it with every agent already known.
    fn introduce(&mut self, agent: &AgentId) {
        if self.agents.contains(agent) {
            return;
        }
        for known in &self.agents {
            self.beliefs
                .insert(AgentPair::new(known.clone(), agent.clone()), RelationshipBelief::new());
        }
        self.agents.push(agent.clone());
    }

    fn record(&mut self, pair: AgentPair, snapshot: Distribution) {
        if self.config.record_history {
            self.history.entry(pair).or_default().insert(self.age, snapshot);
        }
    }
}

impl Default for WorldModel {
    fn default() -> Self {
        Self::with_defaults()
    }
}
