//! Error types.
//!
//! Each layer has its own enum; `GameError` wraps the lower ones so the
//! controller and the step environment surface a single type.

use thiserror::Error;

use super::dice::DieFace;
use super::player::PlayerId;

/// A roll the classifier cannot score.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidRoll {
    #[error("invalid roll: expected 1 to 5 dice, got {len}")]
    Length { len: usize },
    #[error("invalid roll: face {face} is outside 1..=6")]
    Face { face: DieFace },
}

/// Failures raised by a decision policy.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("no action supplied for the pending decision")]
    NoActionSupplied,
    #[error("action has {actual} entries, decision needs {expected}")]
    ActionLengthMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    InvalidRoll(#[from] InvalidRoll),
}

/// Rejected table rules.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player count must be 1-255, got {count}")]
    PlayerCount { count: usize },
    #[error("target score must be positive")]
    TargetScore,
    #[error("eat threshold {threshold} must be below the target score {target}")]
    EatThreshold { threshold: u32, target: u32 },
    #[error("max turns must be positive")]
    MaxTurns,
    #[error("max rolls per turn must be positive")]
    MaxRolls,
    #[error("expected {expected} starting scores, got {actual}")]
    ScoreCount { expected: usize, actual: usize },
    #[error("starting score {score} for {player} must be below the target score {target}")]
    StartingScore {
        player: PlayerId,
        score: u32,
        target: u32,
    },
}

/// Errors surfaced by the game controller and the step environment.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("action has {actual} entries, decision needs {expected}")]
    ActionLengthMismatch { expected: usize, actual: usize },
    #[error("game already finished, {winner} won")]
    GameAlreadyFinished { winner: PlayerId },
    #[error("no decision is pending")]
    NoPendingDecision,
    #[error("game did not finish within {max_turns} turns")]
    TurnLimitReached { max_turns: u32 },
    #[error("turn did not end within {max_rolls} rolls")]
    RollLimitReached { max_rolls: u32 },
    #[error(transparent)]
    InvalidRoll(#[from] InvalidRoll),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GameError {
    /// Lift a policy failure, surfacing a wrong-sized action as
    /// `ActionLengthMismatch` rather than a wrapped policy error.
    #[must_use]
    pub fn from_policy(err: PolicyError) -> Self {
        match err {
            PolicyError::ActionLengthMismatch { expected, actual } => {
                GameError::ActionLengthMismatch { expected, actual }
            }
            PolicyError::InvalidRoll(err) => GameError::InvalidRoll(err),
            other => GameError::Policy(other),
        }
    }
}
