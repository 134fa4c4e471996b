//! Game controller: scores, rotation, eating and the winner.
//!
//! The controller is the only owner of the live `GameState`. It drives the
//! current `TurnStateMachine` one transition at a time and, once the turn
//! ends, applies the outcome:
//!
//! - `Banked`: add the amount to the player's bank. Exactly the target wins.
//!   Otherwise every other player sitting on the same bank is eaten, and the
//!   next player starts fresh.
//! - `Forfeited`: the running score and remaining dice are offered to the
//!   next player.
//! - `Busted`: the next player starts fresh.
//!
//! `GameConfig::carry_after_bank` extends the offer to non-winning banks.

use tracing::info;

use crate::core::{ConfigError, DieSource, GameConfig, GameError, GameState, PlayerId, TurnContext};
use crate::events::GameEvent;
use crate::policy::DecisionPolicy;
use crate::turn::{TurnPhase, TurnStateMachine};

/// Owns and advances one game.
#[derive(Clone, Debug)]
pub struct GameController {
    config: GameConfig,
    state: GameState,
}

impl GameController {
    /// Start a game with every bank at 0.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let state = GameState::new(&config);
        Ok(Self { config, state })
    }

    /// Start a game from the given banks, in seat order.
    ///
    /// Every score must be below the target.
    pub fn with_scores(config: GameConfig, scores: &[u32]) -> Result<Self, GameError> {
        let mut controller = Self::new(config)?;
        let target = controller.config.target_score;

        if scores.len() != controller.config.player_count {
            return Err(ConfigError::ScoreCount {
                expected: controller.config.player_count,
                actual: scores.len(),
            }
            .into());
        }

        for (player, &score) in PlayerId::all(scores.len()).zip(scores) {
            if score >= target {
                return Err(ConfigError::StartingScore {
                    player,
                    score,
                    target,
                }
                .into());
            }
            controller.state.players[player].banked_score = score;
        }

        let first = controller.state.current_player;
        controller.state.turn = TurnStateMachine::new(first, scores[0], target);
        Ok(controller)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Borrow the live state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// A detached copy of the state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.state.current_player
    }

    /// Length of the action the pending decision needs, if one is pending.
    #[must_use]
    pub fn pending_decision_len(&self) -> Option<usize> {
        if self.is_finished() || !self.state.turn.awaits_decision() {
            return None;
        }
        self.state.turn.phase().expected_action_len()
    }

    /// Perform one turn transition, then settle the turn if it ended.
    pub fn advance(
        &mut self,
        policy: &mut dyn DecisionPolicy,
        dice: &mut dyn DieSource,
    ) -> Result<(), GameError> {
        self.ensure_running()?;

        let GameState { turn, events, .. } = &mut self.state;
        turn.advance(policy, dice, events)?;

        if self.state.turn.is_over() {
            self.finish_turn();
        }
        Ok(())
    }

    /// Play forced transitions until the policy has to decide or the game
    /// ends.
    pub fn run_until_decision(
        &mut self,
        policy: &mut dyn DecisionPolicy,
        dice: &mut dyn DieSource,
    ) -> Result<(), GameError> {
        self.ensure_running()?;
        while !self.is_finished() && !self.state.turn.awaits_decision() {
            self.advance(policy, dice)?;
        }
        Ok(())
    }

    /// Play the current turn to its end.
    pub fn play_turn(
        &mut self,
        policy: &mut dyn DecisionPolicy,
        dice: &mut dyn DieSource,
    ) -> Result<(), GameError> {
        self.ensure_running()?;
        let turn_number = self.state.turn_number;
        while !self.is_finished() && self.state.turn_number == turn_number {
            self.advance(policy, dice)?;
        }
        Ok(())
    }

    /// Let `policy` play every seat until someone wins.
    ///
    /// Fails with `TurnLimitReached` past `max_turns`, or `RollLimitReached`
    /// when one turn rolls more than `max_rolls_per_turn` times.
    pub fn play_to_completion(
        &mut self,
        policy: &mut dyn DecisionPolicy,
        dice: &mut dyn DieSource,
    ) -> Result<PlayerId, GameError> {
        loop {
            if let Some(winner) = self.state.winner {
                return Ok(winner);
            }
            self.advance(policy, dice)?;
        }
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if let Some(winner) = self.state.winner {
            return Err(GameError::GameAlreadyFinished { winner });
        }
        if self.state.turn_number > self.config.max_turns {
            return Err(GameError::TurnLimitReached {
                max_turns: self.config.max_turns,
            });
        }
        let turn = &self.state.turn;
        if *turn.phase() == TurnPhase::RollPending
            && turn.rolls() >= self.config.max_rolls_per_turn
        {
            return Err(GameError::RollLimitReached {
                max_rolls: self.config.max_rolls_per_turn,
            });
        }
        Ok(())
    }

    fn finish_turn(&mut self) {
        let player = self.state.current_player;
        if let TurnPhase::Banked { amount } = *self.state.turn.phase() {
            self.bank(player, amount);
            if self.is_finished() {
                return;
            }
        }

        let carry = self.state.turn.carry_over(self.config.carry_after_bank);
        self.start_next_turn(carry);
    }

    fn bank(&mut self, player: PlayerId, amount: u32) {
        let banked_score = self.state.players[player].banked_score + amount;
        self.state.players[player].banked_score = banked_score;
        self.state.events.push(GameEvent::Banked {
            player,
            amount,
            banked_score,
        });
        info!(%player, amount, banked_score, "banked");

        if banked_score == self.config.target_score {
            self.state.winner = Some(player);
            self.state.events.push(GameEvent::Won { player });
            info!(%player, turn = self.state.turn_number, "game won");
            return;
        }

        self.eat(player, banked_score);
    }

    /// Clamp every other bank equal to `banked_score`.
    fn eat(&mut self, player: PlayerId, banked_score: u32) {
        if banked_score == 0 {
            return;
        }

        for other in PlayerId::all(self.state.player_count()) {
            if other == player || self.state.players[other].banked_score != banked_score {
                continue;
            }
            let new_score = self.config.eaten_score(banked_score);
            self.state.players[other].banked_score = new_score;
            self.state.events.push(GameEvent::Ate {
                player,
                eaten: other,
                previous_score: banked_score,
                new_score,
            });
            info!(%player, eaten = %other, previous_score = banked_score, new_score, "ate");
        }
    }

    fn start_next_turn(&mut self, carry: Option<TurnContext>) {
        let from = self.state.current_player;
        let to = from.next(self.state.player_count());
        let banked = self.state.banked_score(to);
        let target = self.config.target_score;

        self.state.current_player = to;
        self.state.turn_number += 1;
        self.state.events.begin_turn(self.state.turn_number);
        self.state.events.push(GameEvent::TurnPassed { from, to });

        self.state.turn = match carry {
            Some(ctx) => {
                self.state.events.push(GameEvent::CarryOffered {
                    player: to,
                    running_score: ctx.running_score,
                    available_count: ctx.available_count,
                });
                TurnStateMachine::with_carry(to, banked, target, ctx)
            }
            None => TurnStateMachine::new(to, banked, target),
        };
    }
}
