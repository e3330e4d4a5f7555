//! # Affinity Core
//!
//! The reasoning half of the workspace. This crate reads stories made of
//! `story_world` action events, infers the hidden relationship (friend,
//! neutral or enemy) between every pair of characters, and uses those beliefs
//! to judge which continuation of a story is more plausible.
//!
//! ## Core Components
//!
//! - **knowledge_base**: How likely each action is under each relationship
//! - **world_model**: Bayesian relationship beliefs with recency weighting
//! - **interpreter**: Co-reference resolution, reading and choice ranking
//! - **evaluation**: Administering forced-choice tasks and scoring the results
//! - **config**: TOML configuration for every tunable constant
//!
//! ## Logging
//!
//! Diagnostics go through `tracing`; no subscriber is installed here.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod interpreter;
pub mod knowledge_base;
pub mod world_model;

pub use config::*;
pub use error::*;
pub use evaluation::*;
pub use interpreter::*;
pub use knowledge_base::*;
pub use world_model::*;
