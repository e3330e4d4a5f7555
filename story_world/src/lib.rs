//! # Story World
//!
//! The "story bible" crate - the plain data a narrated story is made of:
//! agents and agent pairs, relationship categories, action events, scenarios
//! and forced-choice tasks. This crate holds no inference logic.

pub mod entities;
pub mod mechanics;
pub mod scenario;

pub use entities::*;
pub use mechanics::*;
pub use scenario::*;
