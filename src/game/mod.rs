//! Game drivers.
//!
//! - `GameController`: owns the state, settles turns, rotates seats
//! - `DixMilleEnv`: reset/step wrapper for agents acting one decision at a time

pub mod controller;
pub mod env;

pub use controller::GameController;
pub use env::{DixMilleEnv, StepInfo, StepResult};
