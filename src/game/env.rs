//! Step-wise environment for external agents.
//!
//! `reset` starts a game and plays every forced transition (rolls, busts,
//! main pleines) up to the first decision. `step` feeds one action into the
//! pending decision through an `ExternalPolicy` and plays forced transitions
//! again up to the next one.
//!
//! The action is a boolean sequence whose length depends on the decision:
//!
//! | Decision                     | Length          | Meaning                          |
//! |------------------------------|-----------------|----------------------------------|
//! | turn start (carry on offer)  | 1               | `true` rerolls all five dice     |
//! | decision point               | dice on offer   | per die, `true` sets it aside    |
//!
//! A turn start is only offered after the previous player forfeited (or
//! after any non-winning bank with `GameConfig::carry_after_bank`). At a
//! decision point an all-true mask also banks the resulting score.

use serde::{Deserialize, Serialize};

use super::controller::GameController;
use crate::core::{DieSource, GameConfig, GameError, GameState, PlayerId, SeededDice};
use crate::events::EventRecord;
use crate::policy::ExternalPolicy;

/// Diagnostics attached to each step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Events produced by this step, oldest first.
    pub events: Vec<EventRecord>,

    /// The player whose decision the step answered.
    pub acting_player: Option<PlayerId>,
}

/// Result of a step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Snapshot after the step.
    pub state: GameState,

    /// 1.0 if this step won the game, else 0.0.
    pub reward: f32,

    /// Whether a winner exists.
    pub done: bool,

    pub info: StepInfo,
}

/// Dix Mille as a reset/step environment.
#[derive(Clone, Debug)]
pub struct DixMilleEnv<D: DieSource = SeededDice> {
    config: GameConfig,
    controller: GameController,
    policy: ExternalPolicy,
    dice: D,
}

impl DixMilleEnv<SeededDice> {
    /// Create an environment rolling seeded dice.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_dice(config, SeededDice::new(seed))
    }
}

impl<D: DieSource> DixMilleEnv<D> {
    /// Create an environment rolling `dice`.
    pub fn with_dice(config: GameConfig, dice: D) -> Result<Self, GameError> {
        let controller = GameController::new(config.clone())?;
        Ok(Self {
            config,
            controller,
            policy: ExternalPolicy::new(),
            dice,
        })
    }

    /// Start a new game and play up to the first decision.
    pub fn reset(&mut self) -> Result<GameState, GameError> {
        let controller = GameController::new(self.config.clone())?;
        self.start(controller)
    }

    /// Start a new game from the given banks and play up to the first
    /// decision.
    pub fn reset_with_scores(&mut self, scores: &[u32]) -> Result<GameState, GameError> {
        let controller = GameController::with_scores(self.config.clone(), scores)?;
        self.start(controller)
    }

    fn start(&mut self, controller: GameController) -> Result<GameState, GameError> {
        self.controller = controller;
        self.policy.clear();
        self.controller
            .run_until_decision(&mut self.policy, &mut self.dice)?;
        Ok(self.controller.snapshot())
    }

    /// Length of the action the next `step` needs, or `None` once the game
    /// is over.
    #[must_use]
    pub fn expected_action_len(&self) -> Option<usize> {
        self.controller.pending_decision_len()
    }

    /// Answer the pending decision with `action`.
    ///
    /// An all-true action means a full reroll only at a turn start, where it
    /// is the single flag `[true]`. At a decision point an all-true mask
    /// keeps every scoring die on offer and banks; it never rerolls them.
    /// A `[false]` at a turn start with nothing to continue rolls fresh.
    ///
    /// A rejected action leaves the game untouched.
    pub fn step(&mut self, action: &[bool]) -> Result<StepResult, GameError> {
        if let Some(winner) = self.controller.winner() {
            return Err(GameError::GameAlreadyFinished { winner });
        }
        self.controller
            .run_until_decision(&mut self.policy, &mut self.dice)?;

        let expected = self
            .controller
            .pending_decision_len()
            .ok_or(GameError::NoPendingDecision)?;
        if action.len() != expected {
            return Err(GameError::ActionLengthMismatch {
                expected,
                actual: action.len(),
            });
        }

        let acting_player = self.controller.current_player();
        let first_event = self.controller.state().events.len();

        self.policy.supply(action);
        let advanced = self.controller.advance(&mut self.policy, &mut self.dice);
        self.policy.clear();
        advanced?;

        if !self.controller.is_finished() {
            self.controller
                .run_until_decision(&mut self.policy, &mut self.dice)?;
        }

        let state = self.controller.snapshot();
        let done = state.is_finished();
        let info = StepInfo {
            events: state.events.since(first_event).cloned().collect(),
            acting_player: Some(acting_player),
        };

        Ok(StepResult {
            reward: if done { 1.0 } else { 0.0 },
            done,
            info,
            state,
        })
    }

    /// Borrow the live state.
    pub fn state(&self) -> &GameState {
        self.controller.state()
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Access the dice, e.g. to queue faces on a `ScriptedDice`.
    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }
}
