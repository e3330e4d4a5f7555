//! Knowledge Base module - what the reasoner knows about actions.
//!
//! - **Distribution**: a normalized probability per relationship category
//! - **ActionObservationModel**: how likely an action is under each category
//! - **ActionKnowledgeBase**: the action name -> observation model lookup

mod base;
mod distribution;
mod observation;

pub use base::*;
pub use distribution::*;
pub use observation::*;
