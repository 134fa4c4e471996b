//! Decision policies.
//!
//! A turn has three kinds of choice, and a `DecisionPolicy` answers all of
//! them. The turn engine is the same whoever decides:
//!
//! - `HeuristicPolicy`: fixed greedy thresholds, plays a whole game alone
//! - `ExternalPolicy`: relays actions supplied by an outside agent through
//!   the step interface

pub mod heuristic;
pub mod external;

pub use heuristic::{BankRule, ContinueRule, HeuristicConfig, HeuristicPolicy};
pub use external::ExternalPolicy;

use crate::core::{DieFace, KeepMask, PolicyError, TurnContext};

/// Chooses actions at each decision point of a turn.
pub trait DecisionPolicy {
    /// Turn start with a carried-over context: `true` throws it away and
    /// rolls five fresh dice, `false` continues from it.
    ///
    /// Only asked at turn start, where `ctx.at_decision_start` is set.
    fn decide_full_reroll(&mut self, ctx: &TurnContext) -> Result<bool, PolicyError>;

    /// Which of the offered dice to set aside; one flag per die.
    fn decide_keep_mask(
        &mut self,
        available: &[DieFace],
        running_score: u32,
    ) -> Result<KeepMask, PolicyError>;

    /// After setting dice aside: bank `ctx.running_score` now, or roll the
    /// remaining `ctx.available_count` dice again.
    fn decide_redeem(&mut self, ctx: &TurnContext) -> Result<bool, PolicyError>;
}

impl<P: DecisionPolicy + ?Sized> DecisionPolicy for &mut P {
    fn decide_full_reroll(&mut self, ctx: &TurnContext) -> Result<bool, PolicyError> {
        (**self).decide_full_reroll(ctx)
    }

    fn decide_keep_mask(
        &mut self,
        available: &[DieFace],
        running_score: u32,
    ) -> Result<KeepMask, PolicyError> {
        (**self).decide_keep_mask(available, running_score)
    }

    fn decide_redeem(&mut self, ctx: &TurnContext) -> Result<bool, PolicyError> {
        (**self).decide_redeem(ctx)
    }
}

impl<P: DecisionPolicy + ?Sized> DecisionPolicy for Box<P> {
    fn decide_full_reroll(&mut self, ctx: &TurnContext) -> Result<bool, PolicyError> {
        (**self).decide_full_reroll(ctx)
    }

    fn decide_keep_mask(
        &mut self,
        available: &[DieFace],
        running_score: u32,
    ) -> Result<KeepMask, PolicyError> {
        (**self).decide_keep_mask(available, running_score)
    }

    fn decide_redeem(&mut self, ctx: &TurnContext) -> Result<bool, PolicyError> {
        (**self).decide_redeem(ctx)
    }
}
