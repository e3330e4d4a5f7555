//! Co-reference resolution: filling missing participants from memory.

use story_world::{ActionEvent, AgentDirectory, AgentId, ResolvedEvent};

use super::RecencyMemory;

/// Outcome of resolving an event's participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Both participants are concrete agents. Filled slots never repeat the
    /// other participant; an event naming one agent twice is kept as told.
    Resolved(ResolvedEvent),
    /// Some participant could not be determined; carries the original event.
    Unresolved(ActionEvent),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// The resolved event, if any.
    pub fn resolved(&self) -> Option<&ResolvedEvent> {
        match self {
            Resolution::Resolved(event) => Some(event),
            Resolution::Unresolved(_) => None,
        }
    }
}

/// Resolve the participants of `event`, guessing missing ones from memory.
///
/// Participants that already denote agents are kept, even when both name the
/// same agent. The acted-upon slot is filled first, then the actor, each
/// taking the most recent remembered agent that differs from the other
/// participant.
pub fn resolve(event: &ActionEvent, memory: &RecencyMemory, directory: &AgentDirectory) -> Resolution {
    let known = |slot: &Option<AgentId>| {
        slot.as_ref()
            .filter(|agent| directory.is_agent(Some(*agent)))
            .cloned()
    };
    let recall = |other: Option<&AgentId>| {
        memory
            .candidates()
            .find(|candidate| directory.is_agent(Some(*candidate)) && Some(*candidate) != other)
            .cloned()
    };

    let actor = known(&event.actor);
    let acted_upon = known(&event.acted_upon).or_else(|| recall(actor.as_ref()));
    let actor = actor.or_else(|| recall(acted_upon.as_ref()));

    match (actor, acted_upon) {
        (Some(actor), Some(acted_upon)) => {
            Resolution::Resolved(ResolvedEvent::new(actor, event.action.clone(), acted_upon))
        }
        _ => Resolution::Unresolved(event.clone()),
    }
}
