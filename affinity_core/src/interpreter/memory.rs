//! Short-term memory of the two most recently mentioned agents.

use serde::{Deserialize, Serialize};

use story_world::{ActionEvent, AgentDirectory, AgentId, ResolvedEvent};

/// The last two distinct agents mentioned, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyMemory {
    last: Option<AgentId>,
    second_to_last: Option<AgentId>,
}

impl RecencyMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a mention of `agent`. Repeating the most recent agent is a no-op.
    pub fn observe(&mut self, agent: &AgentId) {
        if self.last.as_ref() == Some(agent) {
            return;
        }
        self.second_to_last = self.last.replace(agent.clone());
    }

    /// Note the agent participants of an event.
    ///
    /// The acted-upon participant is observed before the actor, so the actor
    /// ends up most recent. Tokens that are not agents are ignored.
    pub fn observe_event(&mut self, event: &ActionEvent, directory: &AgentDirectory) {
        for participant in [&event.acted_upon, &event.actor] {
            if directory.is_agent(participant.as_ref()) {
                if let Some(agent) = participant {
                    self.observe(agent);
                }
            }
        }
    }

    /// Note the participants of a resolved event, actor last.
    pub fn observe_resolved(&mut self, event: &ResolvedEvent) {
        self.observe(&event.acted_upon);
        self.observe(&event.actor);
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.last = None;
        self.second_to_last = None;
    }

    pub fn last(&self) -> Option<&AgentId> {
        self.last.as_ref()
    }

    pub fn second_to_last(&self) -> Option<&AgentId> {
        self.second_to_last.as_ref()
    }

    /// Remembered agents, most recent first.
    pub fn candidates(&self) -> impl Iterator<Item = &AgentId> {
        self.last.iter().chain(self.second_to_last.iter())
    }
}

impl std::fmt::Display for RecencyMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |a: Option<&AgentId>| a.map_or("_", AgentId::as_str).to_string();
        write!(f, "[{}, {}]", show(self.last()), show(self.second_to_last()))
    }
}
