//! Observation encoding for learning agents.
//!
//! Turns a `GameState` snapshot into a flat `f32` tensor.

use serde::{Deserialize, Serialize};

use crate::core::{GameConfig, GameState, PlayerId, DICE_PER_HAND};
use crate::core::dice::MAX_FACE;
use crate::turn::TurnPhase;

/// Encoded game state as a flat tensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor.
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a new encoded state.
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// Flat observation of a game.
///
/// Layout, for `n` players:
/// - banked scores over the target (`n`)
/// - current player one-hot (`n`)
/// - running score over the target
/// - dice available over five
/// - turn-start flag
/// - decision-point flag
/// - offered dice faces over six, zero-padded (`5`)
///
/// Total features = 2n + 9
#[derive(Clone, Debug)]
pub struct ObservationEncoder {
    player_count: usize,
    target_score: f32,
}

impl ObservationEncoder {
    /// Create an encoder for games played under `config`.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            player_count: config.player_count,
            target_score: config.target_score as f32,
        }
    }

    /// Number of features in an observation.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        2 * self.player_count + 4 + DICE_PER_HAND
    }

    #[must_use]
    pub fn output_shape(&self) -> Vec<usize> {
        vec![self.feature_count()]
    }

    /// Encode `state`.
    pub fn encode(&self, state: &GameState) -> EncodedState {
        let n = self.player_count;
        let mut tensor = vec![0.0f32; self.feature_count()];

        for player in PlayerId::all(n.min(state.player_count())) {
            let idx = player.index();
            tensor[idx] = state.banked_score(player) as f32 / self.target_score;
            if state.current_player == player {
                tensor[n + idx] = 1.0;
            }
        }

        let base = 2 * n;
        let ctx = state.context();
        tensor[base] = ctx.running_score as f32 / self.target_score;
        tensor[base + 1] = ctx.available_count as f32 / DICE_PER_HAND as f32;
        tensor[base + 2] = if *state.turn.phase() == TurnPhase::TurnStart {
            1.0
        } else {
            0.0
        };

        if let Some(dice) = state.offered_dice() {
            tensor[base + 3] = 1.0;
            for (slot, &face) in dice.iter().take(DICE_PER_HAND).enumerate() {
                tensor[base + 4 + slot] = f32::from(face) / f32::from(MAX_FACE);
            }
        }

        EncodedState::new(tensor, self.output_shape())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptedDice;
    use crate::game::GameController;
    use crate::policy::ExternalPolicy;

    #[test]
    fn test_shape() {
        let encoder = ObservationEncoder::new(&GameConfig::new().with_player_count(3));
        assert_eq!(encoder.feature_count(), 15);
        assert_eq!(encoder.output_shape(), vec![15]);
    }

    #[test]
    fn test_new_game_encoding() {
        let config = GameConfig::new().with_player_count(2);
        let state = GameState::new(&config);
        let encoded = ObservationEncoder::new(&config).encode(&state);

        assert_eq!(encoded.len(), 13);
        // Banks
        assert_eq!(&encoded.tensor[0..2], &[0.0, 0.0]);
        // Current player
        assert_eq!(&encoded.tensor[2..4], &[1.0, 0.0]);
        // Running score, dice available, flags
        assert_eq!(&encoded.tensor[4..8], &[0.0, 1.0, 0.0, 0.0]);
        assert!(encoded.tensor[8..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_decision_point_encoding() {
        let config = GameConfig::new().with_player_count(2);
        let mut controller = GameController::with_scores(config.clone(), &[5000, 2500]).unwrap();
        let mut dice = ScriptedDice::new([1, 2, 2, 3, 6]);
        controller
            .run_until_decision(&mut ExternalPolicy::new(), &mut dice)
            .unwrap();

        let encoded = ObservationEncoder::new(&config).encode(controller.state());

        assert_eq!(encoded.get(0), Some(0.5));
        assert_eq!(encoded.get(1), Some(0.25));
        assert_eq!(encoded.get(7), Some(1.0));
        assert_eq!(encoded.get(8), Some(1.0 / 6.0));
        assert_eq!(encoded.get(12), Some(1.0));
    }
}
