//! Game state.
//!
//! ## TurnContext
//!
//! Score and dice the acting player has in play during a turn. Owned by the
//! turn state machine and mutated only by it.
//!
//! ## GameState
//!
//! Complete game state: banked scores in seat order, the seat to act, the
//! live turn, the winner once there is one, and the event history.
//!
//! The controller owns the only live `GameState`. Everything handed out is a
//! clone; the event history is an `im::Vector` so that clone is O(1).

use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::dice::{DieFace, DICE_PER_HAND};
use super::player::{PlayerId, PlayerMap};
use crate::events::EventLog;
use crate::turn::{TurnPhase, TurnStateMachine};

/// A seat and its banked score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,

    /// Points committed to this player, between 0 and the target score.
    pub banked_score: u32,
}

impl PlayerState {
    /// A seat with nothing banked.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            banked_score: 0,
        }
    }
}

/// Points and dice in play for the acting player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnContext {
    /// Points scored this turn, not yet banked.
    pub running_score: u32,

    /// Dice left to roll.
    pub available_count: usize,

    /// True while a decision on untouched dice is open: a carry-over offered
    /// at turn start, or a fresh roll before any of it is set aside.
    pub at_decision_start: bool,
}

impl TurnContext {
    /// Nothing scored, all five dice in hand.
    #[must_use]
    pub const fn fresh() -> Self {
        Self {
            running_score: 0,
            available_count: DICE_PER_HAND,
            at_decision_start: false,
        }
    }

    /// A context inherited from the previous turn, offered at turn start.
    #[must_use]
    pub const fn carried(running_score: u32, available_count: usize) -> Self {
        Self {
            running_score,
            available_count,
            at_decision_start: true,
        }
    }

    /// Whether there is anything to continue from instead of rolling fresh.
    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.running_score > 0 && self.available_count > 0
    }
}

impl Default for TurnContext {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Full game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Seats in turn order.
    pub players: PlayerMap<PlayerState>,

    /// The seat whose turn it is.
    pub current_player: PlayerId,

    /// The live turn.
    pub turn: TurnStateMachine,

    /// Turn number (starts at 1).
    pub turn_number: u32,

    /// Set once a player banks exactly the target score.
    pub winner: Option<PlayerId>,

    /// Everything that happened so far.
    pub events: EventLog,
}

impl GameState {
    /// Create a new game: all banks at 0, player 0 about to roll five dice.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let first = PlayerId::new(0);
        let mut events = EventLog::new();
        events.begin_turn(1);

        Self {
            players: PlayerMap::new(config.player_count, PlayerState::new),
            current_player: first,
            turn: TurnStateMachine::new(first, 0, config.target_score),
            turn_number: 1,
            winner: None,
            events,
        }
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// A player's banked score.
    #[must_use]
    pub fn banked_score(&self, player: PlayerId) -> u32 {
        self.players[player].banked_score
    }

    /// Banked scores in seat order.
    #[must_use]
    pub fn scores(&self) -> Vec<u32> {
        self.players.values().map(|p| p.banked_score).collect()
    }

    /// The acting player's turn context.
    #[must_use]
    pub fn context(&self) -> &TurnContext {
        self.turn.context()
    }

    /// Dice on offer at a decision point, if any.
    #[must_use]
    pub fn offered_dice(&self) -> Option<&[DieFace]> {
        match self.turn.phase() {
            TurnPhase::DecisionPoint { roll } => Some(roll.as_slice()),
            _ => None,
        }
    }

    /// Whether a winner exists.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }
}
