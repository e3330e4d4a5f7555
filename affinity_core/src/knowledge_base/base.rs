//! Action knowledge base - the lookup from action name to observation model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use story_world::RelationshipCategory;

use super::ActionObservationModel;
use crate::error::{AffinityError, Result};

/// Everything the reasoner knows about actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionKnowledgeBase {
    actions: BTreeMap<String, ActionObservationModel>,
}

impl ActionKnowledgeBase {
    /// Create an empty knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the observation model for an action.
    pub fn insert(&mut self, action: impl Into<String>, model: ActionObservationModel) {
        self.actions.insert(action.into(), model);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_action(mut self, action: impl Into<String>, model: ActionObservationModel) -> Self {
        self.insert(action, model);
        self
    }

    /// Get the observation model for an action, if known.
    pub fn get(&self, action: &str) -> Option<&ActionObservationModel> {
        self.actions.get(action)
    }

    /// Get the observation model for an action, failing with
    /// [`AffinityError::InsufficientKnowledge`] when it is unknown.
    pub fn lookup(&self, action: &str) -> Result<&ActionObservationModel> {
        self.actions
            .get(action)
            .ok_or_else(|| AffinityError::InsufficientKnowledge {
                action: action.to_string(),
            })
    }

    /// Check if the action is known.
    pub fn contains(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    /// Number of known actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Iterate over known actions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionObservationModel)> {
        self.actions.iter().map(|(a, m)| (a.as_str(), m))
    }

    /// Build from action name -> categories the action is typical under.
    pub fn from_typical_categories(
        typical: &BTreeMap<String, Vec<RelationshipCategory>>,
        ratio: f64,
    ) -> Result<Self> {
        let mut base = Self::new();
        for (action, categories) in typical {
            base.insert(action.clone(), ActionObservationModel::typical_under(categories, ratio)?);
        }
        Ok(base)
    }

    /// Parse the typicality knowledge format.
    ///
    /// One action per line: `<action> [letters]`, where the letters (`F`, `N`,
    /// `E`) mark the categories the action is typical under. Blank lines and
    /// lines starting with `#` or `//` are skipped. Line numbers in errors are
    /// 1-based.
    pub fn parse_typicality(text: &str, ratio: f64) -> Result<Self> {
        let mut base = Self::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(action) = fields.next() else {
                continue;
            };

            let mut categories = Vec::new();
            if let Some(letters) = fields.next() {
                for letter in letters.chars() {
                    let category = RelationshipCategory::from_letter(letter).ok_or_else(|| {
                        AffinityError::KnowledgeParse {
                            line: i + 1,
                            reason: format!("unknown category letter '{}'", letter),
                        }
                    })?;
                    if !categories.contains(&category) {
                        categories.push(category);
                    }
                }
            }
            if let Some(extra) = fields.next() {
                return Err(AffinityError::KnowledgeParse {
                    line: i + 1,
                    reason: format!("unexpected trailing field '{}'", extra),
                });
            }

            base.insert(action, ActionObservationModel::typical_under(&categories, ratio)?);
        }
        Ok(base)
    }

    /// Load a typicality knowledge file.
    pub fn from_typicality_file(path: &Path, ratio: f64) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_typicality(&content, ratio)
    }

    /// Merge another knowledge base into this one; entries in `other` win.
    pub fn merge(&mut self, other: ActionKnowledgeBase) {
        self.actions.extend(other.actions);
    }
}
