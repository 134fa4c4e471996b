//! Domain events.
//!
//! The engine narrates every transition as a `GameEvent` appended to the
//! game's `EventLog`. Renderers and loggers read the log; the engine never
//! prints.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{PlayerId, Roll};

/// Something that happened during a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were rolled.
    Rolled { player: PlayerId, dice: Roll },

    /// Every rolled die scored; the player rolls five fresh dice.
    MainPleine {
        player: PlayerId,
        points: u32,
        running_score: u32,
    },

    /// Dice were set aside for points.
    Kept {
        player: PlayerId,
        dice: Roll,
        points: u32,
        running_score: u32,
        available_count: usize,
    },

    /// A roll scored nothing; the running score is lost.
    Busted { player: PlayerId, lost: u32 },

    /// The running score was committed.
    Banked {
        player: PlayerId,
        amount: u32,
        banked_score: u32,
    },

    /// Banking would have passed the target; nothing was committed.
    Forfeited {
        player: PlayerId,
        running_score: u32,
        banked_score: u32,
    },

    /// `player` banked onto `eaten`'s score and knocked it down.
    Ate {
        player: PlayerId,
        eaten: PlayerId,
        previous_score: u32,
        new_score: u32,
    },

    /// The previous turn's score and dice are offered to `player`.
    CarryOffered {
        player: PlayerId,
        running_score: u32,
        available_count: usize,
    },

    /// The offer was taken.
    CarryTaken {
        player: PlayerId,
        running_score: u32,
        available_count: usize,
    },

    /// The offer was declined in favour of five fresh dice.
    CarryDeclined { player: PlayerId },

    /// The game is over.
    Won { player: PlayerId },

    /// The turn moved to the next seat.
    TurnPassed { from: PlayerId, to: PlayerId },
}

impl GameEvent {
    /// The player the event is about.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            GameEvent::Rolled { player, .. }
            | GameEvent::MainPleine { player, .. }
            | GameEvent::Kept { player, .. }
            | GameEvent::Busted { player, .. }
            | GameEvent::Banked { player, .. }
            | GameEvent::Forfeited { player, .. }
            | GameEvent::Ate { player, .. }
            | GameEvent::CarryOffered { player, .. }
            | GameEvent::CarryTaken { player, .. }
            | GameEvent::CarryDeclined { player }
            | GameEvent::Won { player } => *player,
            GameEvent::TurnPassed { to, .. } => *to,
        }
    }
}

/// An event stamped with its position in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Turn number the event happened in.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,

    /// The event.
    pub event: GameEvent,
}

/// Append-only event history.
///
/// Backed by `im::Vector` so cloning a game snapshot does not copy it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    records: Vector<EventRecord>,
    turn: u32,
    sequence: u32,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp subsequent events with `turn`, restarting the sequence.
    pub fn begin_turn(&mut self, turn: u32) {
        self.turn = turn;
        self.sequence = 0;
    }

    /// Append an event.
    pub fn push(&mut self, event: GameEvent) {
        debug!(turn = self.turn, sequence = self.sequence, ?event, "game event");
        self.records.push_back(EventRecord {
            turn: self.turn,
            sequence: self.sequence,
            event,
        });
        self.sequence += 1;
    }

    /// Number of events recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Iterate over the records appended at or after `index`.
    pub fn since(&self, index: usize) -> impl Iterator<Item = &EventRecord> {
        self.records.iter().skip(index)
    }

    /// The most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// Iterate over just the events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.records.iter().map(|r| &r.event)
    }
}
