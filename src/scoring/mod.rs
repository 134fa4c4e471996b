//! Dice scoring.
//!
//! `classify` is the single source of truth for what a set of dice is worth.
//! It is pure: the turn engine, the heuristic policy and any external
//! agent all see the same outcome for the same multiset of faces.

pub mod classify;

pub use classify::{classify, ScoringOutcome, FIVE_OF_A_KIND_POINTS, STRAIGHT_POINTS};
