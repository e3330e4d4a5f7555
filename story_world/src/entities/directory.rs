//! Deciding which participant tokens denote agents.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::AgentId;

/// Knows which tokens refer to agents (characters capable of relationships)
/// as opposed to objects and places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "names", rename_all = "snake_case")]
pub enum AgentDirectory {
    /// Every token is an agent except the listed non-agents.
    NonAgents(HashSet<AgentId>),
    /// Only the listed tokens are agents.
    Characters(HashSet<AgentId>),
}

impl AgentDirectory {
    /// Build a directory from the known non-agent tokens.
    pub fn with_non_agents<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AgentId>,
    {
        AgentDirectory::NonAgents(names.into_iter().map(Into::into).collect())
    }

    /// Build a directory from the full cast of characters.
    pub fn with_characters<I, T>(names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AgentId>,
    {
        AgentDirectory::Characters(names.into_iter().map(Into::into).collect())
    }

    /// Check whether a token denotes an agent. An absent token never does.
    pub fn is_agent(&self, token: Option<&AgentId>) -> bool {
        match (self, token) {
            (_, None) => false,
            (AgentDirectory::NonAgents(non_agents), Some(id)) => !non_agents.contains(id),
            (AgentDirectory::Characters(characters), Some(id)) => characters.contains(id),
        }
    }
}

impl Default for AgentDirectory {
    fn default() -> Self {
        AgentDirectory::NonAgents(HashSet::new())
    }
}
