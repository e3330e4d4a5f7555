//! Interpreter - reads stories into world models and judges continuations.
//!
//! Reading a scenario works as follows:
//! 1. **Resolve**: fill missing participants from recency memory
//! 2. **Update**: feed each resolved event's observation model to the world model
//! 3. **Remember**: shift recency memory to the event's agents
//! 4. **Reflect**: impose the default bias on relationships nothing was learned about
//!
//! Ranking reads the premise, then scores every candidate continuation against
//! the resulting world model without learning from the candidates.

mod memory;
mod ranking;
mod resolution;

pub use memory::*;
pub use ranking::*;
pub use resolution::*;

use story_world::{AgentDirectory, AgentPair, Scenario, Task};

use crate::config::AffinityConfig;
use crate::error::Result;
use crate::knowledge_base::{ActionKnowledgeBase, Distribution};
use crate::world_model::{BeliefSummary, RelationshipBelief, WorldModel};

/// An agent that interprets stories through relationship beliefs.
#[derive(Debug, Clone)]
pub struct InterpretingAgent {
    knowledge: ActionKnowledgeBase,
    directory: AgentDirectory,
    config: AffinityConfig,
    memory: RecencyMemory,

    /// World model of the last successful read.
    world: Option<WorldModel>,
}

impl InterpretingAgent {
    /// Create an agent with default configuration.
    pub fn new(knowledge: ActionKnowledgeBase, directory: AgentDirectory) -> Self {
        Self {
            knowledge,
            directory,
            config: AffinityConfig::default(),
            memory: RecencyMemory::new(),
            world: None,
        }
    }

    /// Create an agent whose knowledge comes from the configuration's inline
    /// `[knowledge.actions]` table.
    pub fn from_config(config: AffinityConfig, directory: AgentDirectory) -> Result<Self> {
        config.validate()?;
        let knowledge = config.knowledge_base()?;
        Ok(Self::new(knowledge, directory).with_config(config))
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: AffinityConfig) -> Self {
        self.config = config;
        self
    }

    /// Read a scenario into a fresh world model.
    ///
    /// Memory is cleared first unless `continue_memory` is set, which lets a
    /// follow-up scenario refer back to characters of the previous one. The
    /// world model is always rebuilt. Fails on the first resolved event whose
    /// action is not in the knowledge base; the previous world model is kept
    /// in that case.
    pub fn read(&mut self, scenario: &Scenario, continue_memory: bool) -> Result<&WorldModel> {
        if !continue_memory {
            self.memory.reset();
        }

        let mut world = WorldModel::new(self.config.world.clone());
        for event in scenario {
            match resolve(event, &self.memory, &self.directory) {
                Resolution::Resolved(resolved) => {
                    let observation = self.knowledge.lookup(&resolved.action)?;
                    world.update(&resolved, observation);
                    self.memory.observe_resolved(&resolved);
                }
                Resolution::Unresolved(original) => {
                    tracing::debug!(event = %original, memory = %self.memory, "could not resolve event");
                    self.memory.observe_event(&original, &self.directory);
                }
            }
        }
        world.reflect_and_refine()?;

        tracing::info!(
            events = scenario.len(),
            agents = world.agents().len(),
            pairs = world.pair_count(),
            "scenario read"
        );
        Ok(&*self.world.insert(world))
    }

    /// Judge which choice most plausibly continues the premise.
    ///
    /// Memory ends up as it was at the end of the premise.
    pub fn rank_choices(&mut self, premise: &Scenario, choices: &[Scenario]) -> Result<Ranking> {
        self.read(premise, false)?;
        let snapshot = self.memory.clone();
        let Some(world) = self.world.as_ref() else {
            return Ok(Ranking::Undecided);
        };

        let length = choices.iter().map(Scenario::len).max().unwrap_or(0);
        let mut scores = Vec::with_capacity(choices.len());
        for (index, choice) in choices.iter().enumerate() {
            let score = self.score_choice(world, choice, snapshot.clone())?;
            let probability = score.finish(length);
            tracing::debug!(
                choice = index + 1,
                resolved = score.resolved(),
                probability,
                "choice scored"
            );
            scores.push(probability);
        }

        self.memory = snapshot;
        let ranking = pick_best(&scores);
        tracing::info!(%ranking, ?scores, "choices ranked");
        Ok(ranking)
    }

    /// Rank the two choices of a task.
    pub fn perform_task(&mut self, task: &Task) -> Result<Ranking> {
        self.rank_choices(&task.premise, &task.choices)
    }

    fn score_choice(
        &self,
        world: &WorldModel,
        choice: &Scenario,
        mut memory: RecencyMemory,
    ) -> Result<ChoiceScore> {
        let mut score = ChoiceScore::new();
        for event in choice {
            match resolve(event, &memory, &self.directory) {
                Resolution::Resolved(resolved) => {
                    let observation = self.knowledge.lookup(&resolved.action)?;
                    let p = world.probability_of(&resolved, observation);
                    tracing::debug!(event = %resolved, probability = p, "event scored");
                    score.record(p);
                    memory.observe_resolved(&resolved);
                }
                Resolution::Unresolved(original) => {
                    tracing::debug!(event = %original, "could not resolve choice event");
                    memory.observe_event(&original, &self.directory);
                }
            }
        }
        Ok(score)
    }

    /// World model of the last successful read.
    pub fn world_model(&self) -> Option<&WorldModel> {
        self.world.as_ref()
    }

    /// Current beliefs about a pair; uniform if nothing is known.
    pub fn beliefs(&self, pair: &AgentPair) -> Distribution {
        self.world
            .as_ref()
            .map(|world| world.beliefs_for(pair))
            .unwrap_or_default()
    }

    /// Most believed relationship of a pair and the confidence in it.
    pub fn belief_summary(&self, pair: &AgentPair) -> BeliefSummary {
        match &self.world {
            Some(world) => world.summary_for(pair),
            None => RelationshipBelief::new().summary(),
        }
    }

    pub fn memory(&self) -> &RecencyMemory {
        &self.memory
    }

    pub fn knowledge(&self) -> &ActionKnowledgeBase {
        &self.knowledge
    }

    pub fn directory(&self) -> &AgentDirectory {
        &self.directory
    }

    pub fn config(&self) -> &AffinityConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AffinityError;
    use crate::knowledge_base::ActionObservationModel;
    use story_world::{ActionEvent, AgentId, RelationshipCategory};

    const KNOWLEDGE: &str = "
        greets F
        hugs F
        hits E
        insults E
        cries
    ";

    fn agent() -> InterpretingAgent {
        let knowledge = ActionKnowledgeBase::parse_typicality(KNOWLEDGE, 2.0).unwrap();
        InterpretingAgent::new(knowledge, AgentDirectory::with_non_agents(["door"]))
    }

    fn scenario(events: &[(Option<&str>, &str, Option<&str>)]) -> Scenario {
        events
            .iter()
            .map(|(actor, action, acted_upon)| ActionEvent::partial(*actor, *action, *acted_upon))
            .collect()
    }

    #[test]
    fn test_read_builds_beliefs() {
        let mut agent = agent();
        let story = scenario(&[(Some("A"), "greets", Some("B")), (Some("B"), "hugs", Some("A"))]);
        let world = agent.read(&story, false).unwrap();

        assert_eq!(world.agents().len(), 2);
        let summary = world.summary_for(&AgentPair::new("A", "B"));
        assert_eq!(summary.decided(), Some(RelationshipCategory::Friend));
        assert_eq!(agent.memory().last(), Some(&AgentId::from("B")));
    }

    #[test]
    fn test_read_resolves_missing_participants() {
        let mut agent = agent();
        let story = scenario(&[(Some("A"), "greets", Some("B")), (None, "hits", None)]);
        agent.read(&story, false).unwrap();

        // (_, hits, _) resolves to (B, hits, A)
        let world = agent.world_model().unwrap();
        assert_eq!(world.age(), 2);
        assert_eq!(agent.memory().last(), Some(&AgentId::from("B")));
    }

    #[test]
    fn test_reflection_after_read() {
        let mut agent = agent();
        let story = scenario(&[(Some("A"), "hits", Some("B")), (Some("C"), "hits", Some("A"))]);
        agent.read(&story, false).unwrap();

        let bc = agent.beliefs(&AgentPair::new("B", "C"));
        assert!(bc.neutral > bc.friend && bc.friend > bc.enemy);
    }

    #[test]
    fn test_read_is_deterministic() {
        let story = scenario(&[
            (Some("A"), "greets", Some("B")),
            (None, "insults", Some("C")),
            (Some("C"), "cries", None),
        ]);

        let mut first = agent();
        let mut second = agent();
        let a = first.read(&story, false).unwrap().history_records();
        let b = second.read(&story, false).unwrap().history_records();
        assert_eq!(a, b);

        let again = first.read(&story, false).unwrap().history_records();
        assert_eq!(a, again);
    }

    #[test]
    fn test_missing_knowledge_aborts_read() {
        let mut agent = agent();
        let story = scenario(&[(Some("A"), "waltzes", Some("B"))]);

        let err = agent.read(&story, false).unwrap_err();
        assert!(matches!(err, AffinityError::InsufficientKnowledge { .. }));
        assert_eq!(err.missing_action(), Some("waltzes"));
        assert!(agent.world_model().is_none());
    }

    #[test]
    fn test_unknown_action_in_unresolved_event_is_skipped() {
        let mut agent = agent();
        let story = scenario(&[(None, "waltzes", None)]);

        assert!(agent.read(&story, false).is_ok());
    }

    #[test]
    fn test_continued_memory() {
        let mut agent = agent();
        agent
            .read(&scenario(&[(Some("A"), "greets", Some("B"))]), false)
            .unwrap();

        let follow_up = scenario(&[(None, "hugs", None)]);
        let world = agent.read(&follow_up, true).unwrap();
        assert_eq!(world.age(), 1);
        assert!(world.belief(&AgentPair::new("A", "B")).is_some());

        let world = agent.read(&follow_up, false).unwrap();
        assert_eq!(world.pair_count(), 0);
    }

    #[test]
    fn test_rank_choices_prefers_consistent_continuation() {
        let mut agent = agent();
        let premise = scenario(&[(Some("A"), "greets", Some("B"))]);
        let friendly = scenario(&[(Some("B"), "greets", Some("A"))]);
        let hostile = scenario(&[(Some("B"), "hits", Some("A"))]);

        let ranking = agent.rank_choices(&premise, &[friendly.clone(), hostile.clone()]).unwrap();
        assert_eq!(ranking, Ranking::Chosen(0));

        let ranking = agent.rank_choices(&premise, &[hostile, friendly]).unwrap();
        assert_eq!(ranking, Ranking::Chosen(1));
    }

    #[test]
    fn test_all_unresolved_choices_are_undecided() {
        let mut agent = agent();
        let task = Task::new(
            Scenario::default(),
            scenario(&[(None, "cries", None)]),
            scenario(&[(None, "hugs", None)]),
        );

        assert_eq!(agent.perform_task(&task).unwrap(), Ranking::Undecided);
    }

    #[test]
    fn test_identical_choices_are_undecided() {
        let mut agent = agent();
        let premise = scenario(&[(Some("A"), "greets", Some("B"))]);
        let choice = scenario(&[(Some("B"), "hugs", Some("A"))]);

        let ranking = agent.rank_choices(&premise, &[choice.clone(), choice]).unwrap();
        assert_eq!(ranking, Ranking::Undecided);
    }

    #[test]
    fn test_ranking_restores_premise_memory() {
        let mut agent = agent();
        let premise = scenario(&[(Some("A"), "greets", Some("B"))]);
        let choice = scenario(&[(Some("C"), "hits", Some("D"))]);

        agent.rank_choices(&premise, &[choice.clone(), choice]).unwrap();
        assert_eq!(agent.memory().last(), Some(&AgentId::from("A")));
        assert_eq!(agent.memory().second_to_last(), Some(&AgentId::from("B")));
    }

    #[test]
    fn test_choices_do_not_update_beliefs() {
        let mut agent = agent();
        let premise = scenario(&[(Some("A"), "greets", Some("B"))]);
        let before = agent.read(&premise, false).unwrap().beliefs_for(&AgentPair::new("A", "B"));

        let hostile = scenario(&[(Some("B"), "hits", Some("A")), (Some("A"), "hits", Some("B"))]);
        agent.rank_choices(&premise, &[hostile.clone(), hostile]).unwrap();

        assert_eq!(agent.beliefs(&AgentPair::new("A", "B")), before);
    }

    #[test]
    fn test_missing_knowledge_in_choice_is_fatal() {
        let mut agent = agent();
        let premise = scenario(&[(Some("A"), "greets", Some("B"))]);
        let unknown = scenario(&[(Some("B"), "waltzes", Some("A"))]);

        let err = agent.rank_choices(&premise, &[unknown.clone(), unknown]).unwrap_err();
        assert_eq!(err.missing_action(), Some("waltzes"));
    }

    #[test]
    fn test_from_config() {
        let config = AffinityConfig::from_str(
            r#"
            [knowledge.actions]
            greets = ["friend"]
            "#,
        )
        .unwrap();
        let mut agent = InterpretingAgent::from_config(config, AgentDirectory::default()).unwrap();

        agent
            .read(&scenario(&[(Some("A"), "greets", Some("B"))]), false)
            .unwrap();
        assert_eq!(
            agent.knowledge().get("greets"),
            Some(&ActionObservationModel::typical_under(&[RelationshipCategory::Friend], 2.0).unwrap())
        );
        assert_eq!(
            agent.belief_summary(&AgentPair::new("A", "B")).decided(),
            Some(RelationshipCategory::Friend)
        );
    }

    #[test]
    fn test_self_directed_event_updates_beliefs() {
        let mut agent = agent();
        let world = agent
            .read(&scenario(&[(Some("A"), "hugs", Some("A"))]), false)
            .unwrap();

        assert_eq!(world.agents(), &[AgentId::from("A")]);
        assert_eq!(world.age(), 1);
        assert!(world.belief(&AgentPair::new("A", "A")).unwrap().is_informative());
    }

    #[test]
    fn test_first_tie_stops_ranking() {
        let mut agent = agent();
        let premise = scenario(&[(Some("A"), "greets", Some("B"))]);
        let hostile = scenario(&[(Some("B"), "hits", Some("A"))]);
        let friendly = scenario(&[(Some("B"), "hugs", Some("A"))]);

        let ranking = agent
            .rank_choices(&premise, &[hostile.clone(), hostile, friendly])
            .unwrap();
        assert_eq!(ranking, Ranking::Undecided);
    }

    #[test]
    fn test_unresolved_event_is_padded_with_choice_mean() {
        let mut config = AffinityConfig::default();
        config.world.unknown_pair_probability = 0.6;
        let mut agent = agent().with_config(config);

        // Nothing is remembered after an empty premise, so (_, cries, _) stays
        // unresolved and the second choice is padded with its own mean.
        let resolved_twice = scenario(&[(Some("A"), "greets", Some("B")), (Some("A"), "hits", Some("B"))]);
        let resolved_once = scenario(&[(None, "cries", None), (Some("C"), "hugs", Some("D"))]);
        let ranking = agent
            .rank_choices(&Scenario::default(), &[resolved_twice, resolved_once.clone()])
            .unwrap();
        assert_eq!(ranking, Ranking::Undecided);

        let unresolved = scenario(&[(None, "cries", None), (None, "hugs", None)]);
        let ranking = agent
            .rank_choices(&Scenario::default(), &[unresolved, resolved_once])
            .unwrap();
        assert_eq!(ranking, Ranking::Chosen(1));
    }

    #[test]
    fn test_queries_before_any_read() {
        let agent = agent();
        assert!(agent.world_model().is_none());
        assert_eq!(agent.beliefs(&AgentPair::new("A", "B")), Distribution::uniform());
        assert_eq!(agent.belief_summary(&AgentPair::new("A", "B")).decided(), None);
    }
}
