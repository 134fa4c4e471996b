//! Fixed greedy policy.
//!
//! Three rules, no lookahead:
//!
//! - **Dice**: start from the whole roll and shed dice one at a time, from
//!   the last index to the first, whenever the rest still scores and the
//!   loss is at most `max_shed_loss`. Non-scoring dice and spare 5s go back
//!   into play.
//! - **Bank**: stop once the running score clears a threshold that drops as
//!   fewer dice remain.
//! - **Carry-over**: take a previous player's score only when it is large
//!   enough for the dice left.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use super::DecisionPolicy;
use crate::core::dice::{select, DICE_PER_HAND};
use crate::core::{DieFace, InvalidRoll, KeepMask, PolicyError, TurnContext};
use crate::scoring::classify;

/// Bank when `running_score >= min_running` and at most `max_available`
/// dice remain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRule {
    pub min_running: u32,
    pub max_available: usize,
}

/// Take a carried-over score when `running_score >= min_running` and at
/// least `min_available` dice remain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueRule {
    pub min_running: u32,
    pub min_available: usize,
}

/// Thresholds for `HeuristicPolicy`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Largest point loss accepted when shedding a die.
    pub max_shed_loss: u32,

    /// Any matching rule banks.
    pub bank_rules: Vec<BankRule>,

    /// Any matching rule takes the carry-over.
    pub continue_rules: Vec<ContinueRule>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            max_shed_loss: 50,
            bank_rules: vec![
                BankRule {
                    min_running: 1000,
                    max_available: DICE_PER_HAND,
                },
                BankRule {
                    min_running: 750,
                    max_available: 3,
                },
                BankRule {
                    min_running: 500,
                    max_available: 2,
                },
                BankRule {
                    min_running: 250,
                    max_available: 1,
                },
            ],
            continue_rules: vec![
                ContinueRule {
                    min_running: 500,
                    min_available: 2,
                },
                ContinueRule {
                    min_running: 800,
                    min_available: 1,
                },
            ],
        }
    }
}

impl HeuristicConfig {
    /// Set the shedding tolerance.
    #[must_use]
    pub fn with_max_shed_loss(mut self, loss: u32) -> Self {
        self.max_shed_loss = loss;
        self
    }

    /// Replace the banking thresholds.
    #[must_use]
    pub fn with_bank_rules(mut self, rules: Vec<BankRule>) -> Self {
        self.bank_rules = rules;
        self
    }

    /// Replace the carry-over thresholds.
    #[must_use]
    pub fn with_continue_rules(mut self, rules: Vec<ContinueRule>) -> Self {
        self.continue_rules = rules;
        self
    }
}

/// Greedy rule-set player.
#[derive(Clone, Debug, Default)]
pub struct HeuristicPolicy {
    config: HeuristicConfig,
}

impl HeuristicPolicy {
    /// Create a policy with the standard thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy with custom thresholds.
    pub fn with_config(config: HeuristicConfig) -> Self {
        Self { config }
    }

    /// Get the thresholds.
    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Whether to bank `running_score` with `available_count` dice left.
    #[must_use]
    pub fn should_bank(&self, running_score: u32, available_count: usize) -> bool {
        self.config
            .bank_rules
            .iter()
            .any(|r| running_score >= r.min_running && available_count <= r.max_available)
    }

    /// Whether to continue from a carried-over context.
    #[must_use]
    pub fn should_take_carry(&self, running_score: u32, available_count: usize) -> bool {
        self.config
            .continue_rules
            .iter()
            .any(|r| running_score >= r.min_running && available_count >= r.min_available)
    }

    /// Pick the dice to set aside from `roll`.
    ///
    /// Indices are tested from last to first so that shedding a die never
    /// shifts the ones still to be tested.
    pub fn choose_dice(&self, roll: &[DieFace]) -> Result<KeepMask, InvalidRoll> {
        let mut mask: KeepMask = smallvec![true; roll.len()];
        let mut points = classify(roll)?.points;

        for idx in (0..roll.len()).rev() {
            mask[idx] = false;
            let remaining = select(roll, &mask);
            if remaining.is_empty() {
                mask[idx] = true;
                continue;
            }

            let without = classify(&remaining)?;
            let loss = points.saturating_sub(without.points);
            if without.consumed_count > 0 && loss <= self.config.max_shed_loss {
                points = without.points;
            } else {
                mask[idx] = true;
            }
        }

        Ok(mask)
    }
}

impl DecisionPolicy for HeuristicPolicy {
    fn decide_full_reroll(&mut self, ctx: &TurnContext) -> Result<bool, PolicyError> {
        Ok(!self.should_take_carry(ctx.running_score, ctx.available_count))
    }

    fn decide_keep_mask(
        &mut self,
        available: &[DieFace],
        _running_score: u32,
    ) -> Result<KeepMask, PolicyError> {
        Ok(self.choose_dice(available)?)
    }

    fn decide_redeem(&mut self, ctx: &TurnContext) -> Result<bool, PolicyError> {
        Ok(self.should_bank(ctx.running_score, ctx.available_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kept(roll: &[DieFace]) -> Vec<DieFace> {
        let mask = HeuristicPolicy::new().choose_dice(roll).unwrap();
        select(roll, &mask).to_vec()
    }

    #[test]
    fn test_sheds_non_scoring_dice_and_spare_fives() {
        assert_eq!(kept(&[5, 5, 2, 3, 4]), vec![5]);
        assert_eq!(kept(&[1, 5, 2, 3, 3]), vec![1]);
        assert_eq!(kept(&[2, 6, 5, 3, 3]), vec![5]);
    }

    #[test]
    fn test_keeps_valuable_groups() {
        assert_eq!(kept(&[1, 1, 1, 2, 3]), vec![1, 1, 1]);
        assert_eq!(kept(&[4, 4, 4, 2, 6]), vec![4, 4, 4]);
        assert_eq!(kept(&[1, 1, 4, 6, 2]), vec![1, 1]);
    }

    #[test]
    fn test_drops_fives_beside_a_triple() {
        assert_eq!(kept(&[3, 3, 3, 5, 2]), vec![3, 3, 3]);
        assert_eq!(kept(&[5, 2, 2, 2, 5]), vec![2, 2, 2]);
    }

    #[test]
    fn test_single_scoring_die_is_kept() {
        assert_eq!(kept(&[5]), vec![5]);
        assert_eq!(kept(&[3, 1]), vec![1]);
    }

    #[test]
    fn test_tie_break_scans_from_the_back() {
        // Both 5s are equally cheap to drop; the later one goes first and
        // the earlier one survives because dropping it would leave nothing.
        let mask = HeuristicPolicy::new().choose_dice(&[5, 3, 5]).unwrap();
        assert_eq!(mask.as_slice(), &[true, false, false]);
    }

    #[test]
    fn test_wider_tolerance_sheds_ones() {
        let policy = HeuristicPolicy::with_config(HeuristicConfig::default().with_max_shed_loss(100));
        let mask = policy.choose_dice(&[1, 1, 3]).unwrap();
        assert_eq!(mask.as_slice(), &[true, false, false]);
    }

    #[test]
    fn test_bank_thresholds() {
        let policy = HeuristicPolicy::new();

        assert!(policy.should_bank(1000, 4));
        assert!(!policy.should_bank(950, 4));
        assert!(policy.should_bank(750, 3));
        assert!(!policy.should_bank(700, 3));
        assert!(policy.should_bank(500, 2));
        assert!(!policy.should_bank(450, 2));
        assert!(policy.should_bank(250, 1));
        assert!(!policy.should_bank(200, 1));
    }

    #[test]
    fn test_carry_thresholds() {
        let policy = HeuristicPolicy::new();

        assert!(policy.should_take_carry(500, 2));
        assert!(!policy.should_take_carry(500, 1));
        assert!(policy.should_take_carry(800, 1));
        assert!(!policy.should_take_carry(450, 4));
    }

    #[test]
    fn test_decisions_through_trait() {
        let mut policy = HeuristicPolicy::new();

        assert!(policy
            .decide_full_reroll(&TurnContext::carried(300, 3))
            .unwrap());
        assert!(!policy
            .decide_full_reroll(&TurnContext::carried(900, 1))
            .unwrap());

        let ctx = TurnContext {
            running_score: 550,
            available_count: 2,
            at_decision_start: false,
        };
        assert!(policy.decide_redeem(&ctx).unwrap());

        let mask = policy.decide_keep_mask(&[6, 1, 2], 0).unwrap();
        assert_eq!(mask.as_slice(), &[false, true, false]);
    }

    #[test]
    fn test_invalid_roll_propagates() {
        let mut policy = HeuristicPolicy::new();
        assert_eq!(
            policy.decide_keep_mask(&[9, 1], 0),
            Err(PolicyError::InvalidRoll(InvalidRoll::Face { face: 9 }))
        );
    }
}
