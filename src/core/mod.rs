//! Core engine types: players, dice, die sources, configuration, state, errors.

pub mod player;
pub mod dice;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;

pub use player::{PlayerId, PlayerMap};
pub use dice::{DieFace, KeepMask, Roll, DICE_PER_HAND};
pub use rng::{DiceState, DieSource, ScriptedDice, SeededDice};
pub use config::GameConfig;
pub use error::{ConfigError, GameError, InvalidRoll, PolicyError};
pub use state::{GameState, PlayerState, TurnContext};
