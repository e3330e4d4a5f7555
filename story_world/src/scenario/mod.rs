//! Story value objects: action events, scenarios and forced-choice tasks.

use serde::{Deserialize, Serialize};

use crate::entities::{AgentId, AgentPair};

/// One action occurrence: an actor performing an action, optionally upon
/// someone or something. Either participant may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionEvent {
    pub actor: Option<AgentId>,
    /// Present tense verb, e.g. "greets".
    pub action: String,
    pub acted_upon: Option<AgentId>,
}

impl ActionEvent {
    /// Create an event with both participants given.
    pub fn new(
        actor: impl Into<AgentId>,
        action: impl Into<String>,
        acted_upon: impl Into<AgentId>,
    ) -> Self {
        Self {
            actor: Some(actor.into()),
            action: action.into(),
            acted_upon: Some(acted_upon.into()),
        }
    }

    /// Create an event from optional participants.
    pub fn partial(
        actor: Option<&str>,
        action: impl Into<String>,
        acted_upon: Option<&str>,
    ) -> Self {
        Self {
            actor: actor.map(AgentId::from),
            action: action.into(),
            acted_upon: acted_upon.map(AgentId::from),
        }
    }
}

impl std::fmt::Display for ActionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = |p: &Option<AgentId>| p.as_ref().map(|a| a.as_str().to_string());
        write!(
            f,
            "{} {} {}",
            slot(&self.actor).unwrap_or_else(|| "_".to_string()),
            self.action,
            slot(&self.acted_upon).unwrap_or_else(|| "_".to_string())
        )
    }
}

/// An action event whose participants are both concrete agents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedEvent {
    pub actor: AgentId,
    pub action: String,
    pub acted_upon: AgentId,
}

impl ResolvedEvent {
    pub fn new(
        actor: impl Into<AgentId>,
        action: impl Into<String>,
        acted_upon: impl Into<AgentId>,
    ) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            acted_upon: acted_upon.into(),
        }
    }

    /// The unordered pair of participants.
    pub fn pair(&self) -> AgentPair {
        AgentPair::new(self.actor.clone(), self.acted_upon.clone())
    }

    /// Check whether either participant is a member of the pair.
    pub fn involves_either(&self, pair: &AgentPair) -> bool {
        pair.contains(&self.actor) || pair.contains(&self.acted_upon)
    }
}

impl From<ResolvedEvent> for ActionEvent {
    fn from(event: ResolvedEvent) -> Self {
        Self {
            actor: Some(event.actor),
            action: event.action,
            acted_upon: Some(event.acted_upon),
        }
    }
}

impl std::fmt::Display for ResolvedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.actor, self.action, self.acted_upon)
    }
}

/// An ordered sequence of action events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario {
    events: Vec<ActionEvent>,
}

impl Scenario {
    pub fn new(events: Vec<ActionEvent>) -> Self {
        Self { events }
    }

    /// The events in story order.
    pub fn events(&self) -> &[ActionEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActionEvent> {
        self.events.iter()
    }
}

impl FromIterator<ActionEvent> for Scenario {
    fn from_iter<I: IntoIterator<Item = ActionEvent>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Scenario {
    type Item = &'a ActionEvent;
    type IntoIter = std::slice::Iter<'a, ActionEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// A forced-choice task: a premise and two candidate continuations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub premise: Scenario,
    pub choices: [Scenario; 2],
}

impl Task {
    pub fn new(premise: Scenario, first: Scenario, second: Scenario) -> Self {
        Self {
            premise,
            choices: [first, second],
        }
    }

    /// Event count of the longest choice.
    pub fn longest_choice_len(&self) -> usize {
        self.choices.iter().map(Scenario::len).max().unwrap_or(0)
    }
}

/// A task from an evaluation corpus together with its correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedTask {
    pub number: u32,
    pub task: Task,
    /// Zero-based index of the correct choice.
    pub answer: usize,
}
