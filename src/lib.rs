//! # dix-mille
//!
//! Rules engine and turn state machine for Dix Mille (10,000), a
//! multiplayer dice game: roll five dice, set scoring dice aside, roll the
//! rest or bank, and reach exactly 10,000.
//!
//! ## Design Principles
//!
//! 1. **One Engine, Many Drivers**: the built-in heuristic and an external
//!    agent are both `DecisionPolicy` implementations driving the same
//!    `TurnStateMachine`.
//!
//! 2. **Explicit Phases**: a turn is always in exactly one `TurnPhase`;
//!    nothing is inferred from flag combinations.
//!
//! 3. **Injected Randomness**: every roll comes from a `DieSource`, so games
//!    replay exactly from a seed or a script.
//!
//! 4. **Narration as Data**: transitions append `GameEvent`s to the state's
//!    log and trace them; the engine never prints.
//!
//! ## Modules
//!
//! - `core`: players, dice, die sources, configuration, state, errors
//! - `scoring`: roll classification
//! - `events`: domain events and the event log
//! - `policy`: `DecisionPolicy`, `HeuristicPolicy`, `ExternalPolicy`
//! - `turn`: the per-turn state machine
//! - `game`: `GameController` and the `DixMilleEnv` step interface
//! - `nn`: observation encoding for learning agents
//!
//! ## Example
//!
//! ```rust
//! use dix_mille::{GameConfig, GameController, HeuristicPolicy, SeededDice};
//!
//! let mut game = GameController::new(GameConfig::new().with_player_count(3)).unwrap();
//! let winner = game
//!     .play_to_completion(&mut HeuristicPolicy::new(), &mut SeededDice::new(42))
//!     .unwrap();
//!
//! assert_eq!(game.state().banked_score(winner), 10_000);
//! ```

pub mod core;
pub mod scoring;
pub mod events;
pub mod policy;
pub mod turn;
pub mod game;
pub mod nn;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap,
    DieFace, Roll, KeepMask, DICE_PER_HAND,
    DieSource, SeededDice, ScriptedDice, DiceState,
    GameConfig, GameState, PlayerState, TurnContext,
    ConfigError, GameError, InvalidRoll, PolicyError,
};

pub use crate::scoring::{classify, ScoringOutcome};

pub use crate::events::{EventLog, EventRecord, GameEvent};

pub use crate::policy::{DecisionPolicy, ExternalPolicy, HeuristicConfig, HeuristicPolicy};

pub use crate::turn::{TurnPhase, TurnStateMachine};

pub use crate::game::{DixMilleEnv, GameController, StepInfo, StepResult};

pub use crate::nn::{EncodedState, ObservationEncoder};
