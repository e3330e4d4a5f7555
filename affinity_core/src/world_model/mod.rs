//! World Model module - what the reasoner believes about relationships.
//!
//! - **RelationshipBelief**: a distribution over categories for one pair,
//!   updated by Bayes' rule as actions are observed
//! - **WorldModel**: one belief per pair of agents seen together, with the
//!   recency-weighted update schedule, reflection and history

mod belief;
mod model;

pub use belief::*;
pub use model::*;
