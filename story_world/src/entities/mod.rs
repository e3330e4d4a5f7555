//! Agent identifiers and the unordered pairs that relationships hang off.

mod directory;

pub use directory::*;

use serde::{Deserialize, Serialize};

/// Identifier for a participant token in a story.
///
/// Tokens are plain names ("Alice", "door"); whether a token denotes an agent
/// is decided by an [`AgentDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    /// Create an identifier from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgentId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AgentId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unordered pair of agents.
///
/// Stored as `(min, max)` so that `AgentPair::new(a, b) == AgentPair::new(b, a)`
/// and both hash the same. An agent paired with itself is representable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentPair {
    first: AgentId,
    second: AgentId,
}

impl AgentPair {
    /// Create the canonical pair for two agents, in either order.
    pub fn new(a: impl Into<AgentId>, b: impl Into<AgentId>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// The smaller member under the identifier ordering.
    pub fn first(&self) -> &AgentId {
        &self.first
    }

    /// The larger member under the identifier ordering.
    pub fn second(&self) -> &AgentId {
        &self.second
    }

    /// Check whether the agent is a member of this pair.
    pub fn contains(&self, agent: &AgentId) -> bool {
        &self.first == agent || &self.second == agent
    }

    /// Check whether both members are the same agent.
    pub fn is_reflexive(&self) -> bool {
        self.first == self.second
    }
}

impl std::fmt::Display for AgentPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} & {}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;
    use std::hash::{Hash, Hasher};

    fn hash_of(pair: &AgentPair) -> u64 {
        let mut hasher = DefaultHasher::new();
        pair.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_pair_symmetry() {
        let ab = AgentPair::new("Alice", "Bob");
        let ba = AgentPair::new("Bob", "Alice");

        assert_eq!(ab, ba);
        assert_eq!(hash_of(&ab), hash_of(&ba));
        assert_eq!(ab.first().as_str(), "Alice");
        assert_eq!(ab.second().as_str(), "Bob");
    }

    #[test]
    fn test_pair_in_set() {
        let mut set = HashSet::new();
        set.insert(AgentPair::new("Alice", "Bob"));
        set.insert(AgentPair::new("Bob", "Alice")); // Same pair

        assert_eq!(set.len(), 1);
        assert!(set.contains(&AgentPair::new("Bob", "Alice")));
    }

    #[test]
    fn test_pair_contains() {
        let pair = AgentPair::new("Alice", "Bob");
        assert!(pair.contains(&AgentId::from("Alice")));
        assert!(!pair.contains(&AgentId::from("Carol")));
        assert!(!pair.is_reflexive());
        assert!(AgentPair::new("Alice", "Alice").is_reflexive());
    }

    #[test]
    fn test_pair_display() {
        assert_eq!(AgentPair::new("Bob", "Alice").to_string(), "Alice & Bob");
    }
}
