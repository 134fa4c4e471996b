//! One player's turn as an explicit state machine.
//!
//! ```text
//!  TurnStart ──(continue / reroll)──▶ RollPending ◀──────────────┐
//!                                      │   │  │                  │
//!                          main pleine ┘   │  └ nothing scored   │
//!                          (5 fresh dice)  │       ▼             │
//!                                          │     Busted          │
//!                                          ▼                     │
//!                                    DecisionPoint ──(roll on)───┘
//!                                       │      │
//!                              bank / = │      │ > target
//!                                       ▼      ▼
//!                                    Banked  Forfeited
//! ```
//!
//! Each call to [`TurnStateMachine::advance`] performs exactly one
//! transition. Policy and dice failures leave the machine untouched, so a
//! caller that supplies a missing action can simply call `advance` again.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::dice::select;
use crate::core::{DieSource, GameError, PlayerId, Roll, TurnContext, DICE_PER_HAND};
use crate::events::{EventLog, GameEvent};
use crate::policy::DecisionPolicy;
use crate::scoring::{classify, ScoringOutcome};

/// Where a turn stands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The previous turn's context is on offer; the policy picks between it
    /// and five fresh dice.
    TurnStart,

    /// About to roll `available_count` dice.
    RollPending,

    /// A roll scored partially; the policy picks dice and whether to bank.
    DecisionPoint { roll: Roll },

    /// A roll scored nothing. Terminal.
    Busted,

    /// The running score was banked. Terminal.
    Banked { amount: u32 },

    /// Banking would have passed the target. Terminal.
    Forfeited,
}

impl TurnPhase {
    /// Whether the turn is over.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TurnPhase::Busted | TurnPhase::Banked { .. } | TurnPhase::Forfeited
        )
    }

    /// Length of the action the phase waits for, if it waits for one.
    #[must_use]
    pub fn expected_action_len(&self) -> Option<usize> {
        match self {
            TurnPhase::TurnStart => Some(1),
            TurnPhase::DecisionPoint { roll } => Some(roll.len()),
            _ => None,
        }
    }
}

/// Drives one player's turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStateMachine {
    player: PlayerId,
    banked_score: u32,
    target_score: u32,
    context: TurnContext,
    phase: TurnPhase,
    rolls: u32,
}

impl TurnStateMachine {
    /// A fresh turn: nothing running, five dice about to be rolled.
    #[must_use]
    pub fn new(player: PlayerId, banked_score: u32, target_score: u32) -> Self {
        Self {
            player,
            banked_score,
            target_score,
            context: TurnContext::fresh(),
            phase: TurnPhase::RollPending,
            rolls: 0,
        }
    }

    /// A turn that opens with `carry` on offer.
    #[must_use]
    pub fn with_carry(
        player: PlayerId,
        banked_score: u32,
        target_score: u32,
        carry: TurnContext,
    ) -> Self {
        Self {
            player,
            banked_score,
            target_score,
            context: TurnContext {
                at_decision_start: true,
                ..carry
            },
            phase: TurnPhase::TurnStart,
            rolls: 0,
        }
    }

    /// The acting player.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// The acting player's bank when the turn began.
    #[must_use]
    pub fn banked_score(&self) -> u32 {
        self.banked_score
    }

    #[must_use]
    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    /// Score and dice in play.
    #[must_use]
    pub fn context(&self) -> &TurnContext {
        &self.context
    }

    #[must_use]
    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// Dice rolls made so far this turn.
    #[must_use]
    pub fn rolls(&self) -> u32 {
        self.rolls
    }

    /// Whether the next `advance` consults the policy.
    #[must_use]
    pub fn awaits_decision(&self) -> bool {
        matches!(
            self.phase,
            TurnPhase::TurnStart | TurnPhase::DecisionPoint { .. }
        )
    }

    /// Whether the turn has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Whether the turn banked exactly the target score.
    #[must_use]
    pub fn is_win(&self) -> bool {
        match self.phase {
            TurnPhase::Banked { amount } => self.banked_score + amount == self.target_score,
            _ => false,
        }
    }

    /// The context to offer the next player, if any.
    ///
    /// A forfeited turn hands over its running score and remaining dice. A
    /// turn that banked without winning does so only when `after_bank` is
    /// set. Busts, wins and unfinished turns hand over nothing.
    #[must_use]
    pub fn carry_over(&self, after_bank: bool) -> Option<TurnContext> {
        let ends_with_offer = match self.phase {
            TurnPhase::Banked { .. } => after_bank && !self.is_win(),
            TurnPhase::Forfeited => true,
            _ => false,
        };
        (ends_with_offer && self.context.can_continue()).then(|| {
            TurnContext::carried(self.context.running_score, self.context.available_count)
        })
    }

    /// Perform one transition.
    ///
    /// Fails with `NoPendingDecision` once the turn is over.
    pub fn advance(
        &mut self,
        policy: &mut dyn DecisionPolicy,
        dice: &mut dyn DieSource,
        log: &mut EventLog,
    ) -> Result<(), GameError> {
        let next = match self.phase.clone() {
            TurnPhase::TurnStart => self.start(policy, log)?,
            TurnPhase::RollPending => self.roll(dice, log)?,
            TurnPhase::DecisionPoint { roll } => self.decide(&roll, policy, log)?,
            _ => return Err(GameError::NoPendingDecision),
        };

        debug!(
            player = %self.player,
            from = ?self.phase,
            to = ?next,
            running_score = self.context.running_score,
            available_count = self.context.available_count,
            "turn transition"
        );
        self.phase = next;
        Ok(())
    }

    fn start(
        &mut self,
        policy: &mut dyn DecisionPolicy,
        log: &mut EventLog,
    ) -> Result<TurnPhase, GameError> {
        let offered = self.context;
        let full_reroll = policy
            .decide_full_reroll(&offered)
            .map_err(GameError::from_policy)?;

        if !full_reroll && offered.can_continue() {
            log.push(GameEvent::CarryTaken {
                player: self.player,
                running_score: offered.running_score,
                available_count: offered.available_count,
            });
            self.context = TurnContext {
                at_decision_start: false,
                ..offered
            };
        } else {
            if offered.can_continue() {
                log.push(GameEvent::CarryDeclined {
                    player: self.player,
                });
            }
            self.context = TurnContext::fresh();
        }

        Ok(TurnPhase::RollPending)
    }

    fn roll(&mut self, dice: &mut dyn DieSource, log: &mut EventLog) -> Result<TurnPhase, GameError> {
        let roll = dice.roll(self.context.available_count);
        let outcome = classify(&roll)?;
        self.rolls += 1;
        log.push(GameEvent::Rolled {
            player: self.player,
            dice: roll.clone(),
        });

        if outcome.is_bust() {
            let lost = std::mem::take(&mut self.context.running_score);
            log.push(GameEvent::Busted {
                player: self.player,
                lost,
            });
            return Ok(TurnPhase::Busted);
        }

        if outcome.is_main_pleine(roll.len()) {
            self.context.running_score =
                self.context.running_score.saturating_add(outcome.points);
            self.context.available_count = DICE_PER_HAND;
            self.context.at_decision_start = false;
            log.push(GameEvent::MainPleine {
                player: self.player,
                points: outcome.points,
                running_score: self.context.running_score,
            });
            return Ok(TurnPhase::RollPending);
        }

        self.context.at_decision_start = true;
        Ok(TurnPhase::DecisionPoint { roll })
    }

    fn decide(
        &mut self,
        roll: &Roll,
        policy: &mut dyn DecisionPolicy,
        log: &mut EventLog,
    ) -> Result<TurnPhase, GameError> {
        let mask = policy
            .decide_keep_mask(roll, self.context.running_score)
            .map_err(GameError::from_policy)?;
        if mask.len() != roll.len() {
            return Err(GameError::ActionLengthMismatch {
                expected: roll.len(),
                actual: mask.len(),
            });
        }

        let kept = select(roll, &mask);
        let outcome = if kept.is_empty() {
            ScoringOutcome::default()
        } else {
            classify(&kept)?
        };

        if outcome.is_bust() && self.context.running_score == 0 {
            log.push(GameEvent::Busted {
                player: self.player,
                lost: 0,
            });
            return Ok(TurnPhase::Busted);
        }

        let next = TurnContext {
            running_score: self.context.running_score.saturating_add(outcome.points),
            available_count: self
                .context
                .available_count
                .saturating_sub(outcome.consumed_count),
            at_decision_start: false,
        };
        let total = self.banked_score.saturating_add(next.running_score);

        let phase = if total > self.target_score {
            TurnPhase::Forfeited
        } else if total == self.target_score || outcome.is_bust() {
            // Nothing newly scored: bank what is already running.
            TurnPhase::Banked {
                amount: next.running_score,
            }
        } else if policy.decide_redeem(&next).map_err(GameError::from_policy)? {
            TurnPhase::Banked {
                amount: next.running_score,
            }
        } else {
            TurnPhase::RollPending
        };

        if !outcome.is_bust() {
            log.push(GameEvent::Kept {
                player: self.player,
                dice: outcome.scored_dice.clone(),
                points: outcome.points,
                running_score: next.running_score,
                available_count: next.available_count,
            });
        }
        if phase == TurnPhase::Forfeited {
            log.push(GameEvent::Forfeited {
                player: self.player,
                running_score: next.running_score,
                banked_score: self.banked_score,
            });
        }

        self.context = next;
        Ok(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PolicyError, ScriptedDice};
    use crate::policy::{ExternalPolicy, HeuristicPolicy};

    const TARGET: u32 = 10_000;

    fn p0() -> PlayerId {
        PlayerId::new(0)
    }

    /// Advance until the turn ends or waits on the external policy.
    fn run(
        turn: &mut TurnStateMachine,
        policy: &mut dyn DecisionPolicy,
        dice: &mut ScriptedDice,
        log: &mut EventLog,
    ) {
        while !turn.is_over() {
            turn.advance(policy, dice, log).unwrap();
        }
    }

    #[test]
    fn test_bust_on_first_roll() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([2, 3, 4, 6, 6]);
        let mut log = EventLog::new();

        turn.advance(&mut HeuristicPolicy::new(), &mut dice, &mut log)
            .unwrap();

        assert_eq!(turn.phase(), &TurnPhase::Busted);
        assert_eq!(turn.context().running_score, 0);
        assert_eq!(turn.carry_over(true), None);
        assert!(matches!(
            log.last().map(|r| &r.event),
            Some(GameEvent::Busted { lost: 0, .. })
        ));
    }

    #[test]
    fn test_main_pleine_resets_dice() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([1, 1, 1, 5, 5]);
        let mut log = EventLog::new();

        turn.advance(&mut HeuristicPolicy::new(), &mut dice, &mut log)
            .unwrap();

        assert_eq!(turn.phase(), &TurnPhase::RollPending);
        assert_eq!(turn.context().running_score, 1100);
        assert_eq!(turn.context().available_count, 5);
        assert!(!turn.context().at_decision_start);
        assert_eq!(turn.rolls(), 1);
    }

    #[test]
    fn test_main_pleine_streak_counts_rolls() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([1, 1, 1, 1, 1]);
        let mut log = EventLog::new();
        let mut policy = HeuristicPolicy::new();

        for _ in 0..25 {
            turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        }

        assert_eq!(turn.phase(), &TurnPhase::RollPending);
        assert_eq!(turn.rolls(), 25);
        assert_eq!(turn.context().running_score, 250_000);
    }

    #[test]
    fn test_running_score_saturates() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        turn.context.running_score = u32::MAX - 100;
        let mut dice = ScriptedDice::new([1, 1, 1, 1, 1]);
        let mut log = EventLog::new();

        turn.advance(&mut HeuristicPolicy::new(), &mut dice, &mut log)
            .unwrap();

        assert_eq!(turn.context().running_score, u32::MAX);
    }

    #[test]
    fn test_decision_point_marks_fresh_roll() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([1, 2, 2, 3, 4]);
        let mut log = EventLog::new();
        let mut policy = ExternalPolicy::new();

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        assert!(turn.awaits_decision());
        assert!(turn.context().at_decision_start);

        policy.supply(&[true, false, false, false, false]);
        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        assert_eq!(turn.phase(), &TurnPhase::RollPending);
        assert!(!turn.context().at_decision_start);
    }

    #[test]
    fn test_heuristic_keeps_and_banks() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([1, 1, 1, 2, 3]);
        let mut log = EventLog::new();

        run(&mut turn, &mut HeuristicPolicy::new(), &mut dice, &mut log);

        assert_eq!(turn.phase(), &TurnPhase::Banked { amount: 1000 });
        assert_eq!(turn.context().available_count, 2);
        assert!(!turn.is_win());
        assert_eq!(turn.carry_over(false), None);
        assert_eq!(turn.carry_over(true), Some(TurnContext::carried(1000, 2)));
    }

    #[test]
    fn test_exact_target_banks_as_win() {
        let mut turn = TurnStateMachine::new(p0(), 9500, TARGET);
        let mut dice = ScriptedDice::new([5, 5, 5, 2, 3]);
        let mut log = EventLog::new();
        let mut policy = ExternalPolicy::new();

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        policy.supply(&[true, true, true, false, false]);
        turn.advance(&mut policy, &mut dice, &mut log).unwrap();

        assert_eq!(turn.phase(), &TurnPhase::Banked { amount: 500 });
        assert!(turn.is_win());
        assert_eq!(turn.carry_over(true), None);
    }

    #[test]
    fn test_overshoot_forfeits() {
        let mut turn = TurnStateMachine::new(p0(), 9700, TARGET);
        let mut dice = ScriptedDice::new([5, 5, 5, 2, 3]);
        let mut log = EventLog::new();
        let mut policy = ExternalPolicy::new();

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        policy.supply(&[true, true, true, false, false]);
        turn.advance(&mut policy, &mut dice, &mut log).unwrap();

        assert_eq!(turn.phase(), &TurnPhase::Forfeited);
        assert_eq!(turn.context().running_score, 500);
        assert_eq!(turn.carry_over(false), Some(TurnContext::carried(500, 2)));
        assert!(matches!(
            log.last().map(|r| &r.event),
            Some(GameEvent::Forfeited {
                running_score: 500,
                banked_score: 9700,
                ..
            })
        ));
    }

    #[test]
    fn test_keeping_nothing_without_score_busts() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([1, 2, 2, 3, 4]);
        let mut log = EventLog::new();
        let mut policy = ExternalPolicy::new();

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        policy.supply(&[false; 5]);
        turn.advance(&mut policy, &mut dice, &mut log).unwrap();

        assert_eq!(turn.phase(), &TurnPhase::Busted);
    }

    #[test]
    fn test_keeping_nothing_with_score_banks_running() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([1, 2, 2, 3, 4, 2, 3, 5, 6]);
        let mut log = EventLog::new();
        let mut policy = ExternalPolicy::new();

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        policy.supply(&[true, false, false, false, false]);
        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        assert_eq!(turn.phase(), &TurnPhase::RollPending);
        assert_eq!(turn.context().available_count, 4);

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        assert_eq!(turn.phase().expected_action_len(), Some(4));
        policy.supply(&[false; 4]);
        turn.advance(&mut policy, &mut dice, &mut log).unwrap();

        assert_eq!(turn.phase(), &TurnPhase::Banked { amount: 100 });
        assert_eq!(turn.context().available_count, 4);
    }

    #[test]
    fn test_keeping_everything_banks() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([1, 2, 2, 3, 4]);
        let mut log = EventLog::new();
        let mut policy = ExternalPolicy::new();

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        policy.supply(&[true; 5]);
        turn.advance(&mut policy, &mut dice, &mut log).unwrap();

        assert_eq!(turn.phase(), &TurnPhase::Banked { amount: 100 });
        assert_eq!(turn.context().available_count, 4);
    }

    #[test]
    fn test_failed_decision_leaves_turn_untouched() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([1, 2, 2, 3, 4]);
        let mut log = EventLog::new();
        let mut policy = ExternalPolicy::new();

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        let before = turn.clone();
        let logged = log.len();

        assert_eq!(
            turn.advance(&mut policy, &mut dice, &mut log),
            Err(GameError::Policy(PolicyError::NoActionSupplied))
        );
        policy.supply(&[true]);
        assert_eq!(
            turn.advance(&mut policy, &mut dice, &mut log),
            Err(GameError::ActionLengthMismatch {
                expected: 5,
                actual: 1
            })
        );

        assert_eq!(turn, before);
        assert_eq!(log.len(), logged);
    }

    #[test]
    fn test_carry_taken() {
        let mut turn =
            TurnStateMachine::with_carry(p0(), 0, TARGET, TurnContext::carried(600, 2));
        let mut dice = ScriptedDice::new([5, 2]);
        let mut log = EventLog::new();
        assert!(turn.awaits_decision());
        assert_eq!(turn.phase().expected_action_len(), Some(1));

        let mut policy = HeuristicPolicy::new();
        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        assert_eq!(turn.phase(), &TurnPhase::RollPending);
        assert_eq!(turn.context().running_score, 600);
        assert!(!turn.context().at_decision_start);

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        assert_eq!(
            turn.phase(),
            &TurnPhase::DecisionPoint {
                roll: [5, 2].into_iter().collect()
            }
        );
        assert!(turn.context().at_decision_start);
    }

    #[test]
    fn test_carry_declined() {
        let mut turn =
            TurnStateMachine::with_carry(p0(), 0, TARGET, TurnContext::carried(300, 3));
        let mut dice = ScriptedDice::new([2, 3, 4, 6, 6]);
        let mut log = EventLog::new();

        turn.advance(&mut HeuristicPolicy::new(), &mut dice, &mut log)
            .unwrap();

        assert_eq!(*turn.context(), TurnContext::fresh());
        assert!(matches!(
            log.last().map(|r| &r.event),
            Some(GameEvent::CarryDeclined { .. })
        ));
    }

    #[test]
    fn test_declining_reroll_with_nothing_to_continue_rolls_fresh() {
        let mut turn =
            TurnStateMachine::with_carry(p0(), 0, TARGET, TurnContext::carried(0, 5));
        let mut dice = ScriptedDice::new([2, 3, 4, 6, 6]);
        let mut log = EventLog::new();
        let mut policy = ExternalPolicy::new();

        policy.supply(&[false]);
        turn.advance(&mut policy, &mut dice, &mut log).unwrap();

        assert_eq!(turn.phase(), &TurnPhase::RollPending);
        assert_eq!(*turn.context(), TurnContext::fresh());
        assert!(log.is_empty());
    }

    #[test]
    fn test_advance_after_end_fails() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([2, 3, 4, 6, 6]);
        let mut log = EventLog::new();
        let mut policy = HeuristicPolicy::new();

        turn.advance(&mut policy, &mut dice, &mut log).unwrap();
        assert_eq!(
            turn.advance(&mut policy, &mut dice, &mut log),
            Err(GameError::NoPendingDecision)
        );
    }

    #[test]
    fn test_bad_face_surfaces_as_invalid_roll() {
        let mut turn = TurnStateMachine::new(p0(), 0, TARGET);
        let mut dice = ScriptedDice::new([7]);
        let mut log = EventLog::new();

        assert!(matches!(
            turn.advance(&mut HeuristicPolicy::new(), &mut dice, &mut log),
            Err(GameError::InvalidRoll(_))
        ));
        assert_eq!(turn.phase(), &TurnPhase::RollPending);
    }
}
