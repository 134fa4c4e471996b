//! Game configuration.
//!
//! `GameConfig` fixes the table rules for a game: how many seats, the exact
//! score that wins, where the eating penalty clamps to, whether a banked
//! turn's leftovers pass to the next seat, and turn and roll guards for
//! autonomous runs. Configure with the builder methods, then
//! `validate` before handing the config to a controller.
//!
//! ```
//! use dix_mille::core::GameConfig;
//!
//! let config = GameConfig::new().with_player_count(3).with_max_turns(500);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.target_score, 10_000);
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Score a player must bank exactly to win.
pub const DEFAULT_TARGET_SCORE: u32 = 10_000;

/// Scores above this clamp to it when eaten; scores at or below drop to 0.
pub const DEFAULT_EAT_THRESHOLD: u32 = 5_000;

/// Table rules for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats (1-255).
    pub player_count: usize,

    /// Banked score that wins the game when reached exactly.
    pub target_score: u32,

    /// Eating clamp: an eaten score above this becomes this, otherwise 0.
    pub eat_threshold: u32,

    /// Maximum turns an autonomous run may take before giving up.
    pub max_turns: u32,

    /// Maximum rolls within one turn. An endless run of main pleines never
    /// ends the turn, so `max_turns` alone cannot stop it.
    pub max_rolls_per_turn: u32,

    /// Offer the next player a non-winning banked turn's running score and
    /// remaining dice ("suivre"), as is done after a forfeit. Off by default:
    /// a bank hands the next player a fresh turn.
    pub carry_after_bank: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 5,
            target_score: DEFAULT_TARGET_SCORE,
            eat_threshold: DEFAULT_EAT_THRESHOLD,
            max_turns: 100_000,
            max_rolls_per_turn: 1_000,
            carry_after_bank: false,
        }
    }
}

impl GameConfig {
    /// Create a config with the standard table rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of seats.
    #[must_use]
    pub fn with_player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    /// Set the exact winning score.
    #[must_use]
    pub fn with_target_score(mut self, target: u32) -> Self {
        self.target_score = target;
        self
    }

    /// Set the eating clamp.
    #[must_use]
    pub fn with_eat_threshold(mut self, threshold: u32) -> Self {
        self.eat_threshold = threshold;
        self
    }

    /// Set the turn guard for autonomous runs.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set the roll guard for a single turn.
    #[must_use]
    pub fn with_max_rolls_per_turn(mut self, max_rolls: u32) -> Self {
        self.max_rolls_per_turn = max_rolls;
        self
    }

    /// Enable or disable the carry-over offer after a bank.
    #[must_use]
    pub fn with_carry_after_bank(mut self, enabled: bool) -> Self {
        self.carry_after_bank = enabled;
        self
    }

    /// Check the rules are playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=255).contains(&self.player_count) {
            return Err(ConfigError::PlayerCount {
                count: self.player_count,
            });
        }
        if self.target_score == 0 {
            return Err(ConfigError::TargetScore);
        }
        if self.eat_threshold >= self.target_score {
            return Err(ConfigError::EatThreshold {
                threshold: self.eat_threshold,
                target: self.target_score,
            });
        }
        if self.max_turns == 0 {
            return Err(ConfigError::MaxTurns);
        }
        if self.max_rolls_per_turn == 0 {
            return Err(ConfigError::MaxRolls);
        }
        Ok(())
    }

    /// Where an eaten score lands.
    #[must_use]
    pub fn eaten_score(&self, score: u32) -> u32 {
        if score <= self.eat_threshold {
            0
        } else {
            self.eat_threshold
        }
    }
}
