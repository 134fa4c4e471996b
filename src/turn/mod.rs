//! The per-turn state machine.
//!
//! A turn moves through `TurnStart` (only when a carry-over is on offer),
//! `RollPending` and `DecisionPoint` until it ends `Busted`, `Banked` or
//! `Forfeited`. The controller owns the machine and applies its outcome to
//! the scores.

pub mod machine;

pub use machine::{TurnPhase, TurnStateMachine};
