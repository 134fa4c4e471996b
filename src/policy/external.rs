//! Policy driven by an outside agent.
//!
//! The agent supplies one action per decision; the policy hands it to the
//! turn engine verbatim on the next query. A query with nothing buffered
//! fails with `NoActionSupplied` and leaves the game where it was, so the
//! caller can supply the action and retry.
//!
//! Banking is signalled through the keep mask: keeping every offered die
//! means "take what scores and bank now".

use super::DecisionPolicy;
use crate::core::{DieFace, KeepMask, PolicyError, TurnContext};

/// Buffers the next externally supplied action.
#[derive(Clone, Debug, Default)]
pub struct ExternalPolicy {
    pending: Option<KeepMask>,
    redeem_requested: bool,
}

impl ExternalPolicy {
    /// Create a policy with nothing buffered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer the action for the next decision, replacing any unused one.
    pub fn supply(&mut self, action: &[bool]) {
        self.pending = Some(action.into());
    }

    /// Check if an action is waiting to be used.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any buffered action.
    pub fn clear(&mut self) {
        self.pending = None;
        self.redeem_requested = false;
    }

    fn take(&mut self, expected: usize) -> Result<KeepMask, PolicyError> {
        let action = self.pending.take().ok_or(PolicyError::NoActionSupplied)?;
        if action.len() != expected {
            let actual = action.len();
            self.pending = Some(action);
            return Err(PolicyError::ActionLengthMismatch { expected, actual });
        }
        Ok(action)
    }
}

impl DecisionPolicy for ExternalPolicy {
    fn decide_full_reroll(&mut self, _ctx: &TurnContext) -> Result<bool, PolicyError> {
        let action = self.take(1)?;
        Ok(action.iter().all(|&reroll| reroll))
    }

    fn decide_keep_mask(
        &mut self,
        available: &[DieFace],
        _running_score: u32,
    ) -> Result<KeepMask, PolicyError> {
        let mask = self.take(available.len())?;
        self.redeem_requested = mask.iter().all(|&keep| keep);
        Ok(mask)
    }

    fn decide_redeem(&mut self, _ctx: &TurnContext) -> Result<bool, PolicyError> {
        Ok(std::mem::take(&mut self.redeem_requested))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_without_action_fails() {
        let mut policy = ExternalPolicy::new();

        assert_eq!(
            policy.decide_full_reroll(&TurnContext::carried(500, 2)),
            Err(PolicyError::NoActionSupplied)
        );
        assert_eq!(
            policy.decide_keep_mask(&[1, 2, 3], 0),
            Err(PolicyError::NoActionSupplied)
        );
    }

    #[test]
    fn test_action_is_consumed_once() {
        let mut policy = ExternalPolicy::new();
        policy.supply(&[true, false, true]);
        assert!(policy.has_pending());

        let mask = policy.decide_keep_mask(&[1, 4, 5], 0).unwrap();
        assert_eq!(mask.as_slice(), &[true, false, true]);
        assert!(!policy.has_pending());

        assert_eq!(
            policy.decide_keep_mask(&[1, 4, 5], 0),
            Err(PolicyError::NoActionSupplied)
        );
    }

    #[test]
    fn test_length_mismatch_keeps_action_buffered() {
        let mut policy = ExternalPolicy::new();
        policy.supply(&[true, false]);

        assert_eq!(
            policy.decide_keep_mask(&[1, 4, 5], 0),
            Err(PolicyError::ActionLengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(policy.has_pending());
    }

    #[test]
    fn test_full_reroll_returns_supplied_flag() {
        let mut policy = ExternalPolicy::new();
        let ctx = TurnContext::carried(600, 2);

        policy.supply(&[true]);
        assert!(policy.decide_full_reroll(&ctx).unwrap());

        policy.supply(&[false]);
        assert!(!policy.decide_full_reroll(&ctx).unwrap());
    }

    #[test]
    fn test_keeping_everything_requests_redeem() {
        let mut policy = ExternalPolicy::new();
        let ctx = TurnContext::fresh();

        policy.supply(&[true, true]);
        policy.decide_keep_mask(&[1, 3], 0).unwrap();
        assert!(policy.decide_redeem(&ctx).unwrap());
        // The request is used up by the redeem query.
        assert!(!policy.decide_redeem(&ctx).unwrap());

        policy.supply(&[true, false]);
        policy.decide_keep_mask(&[1, 3], 0).unwrap();
        assert!(!policy.decide_redeem(&ctx).unwrap());
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut policy = ExternalPolicy::new();
        policy.supply(&[true]);
        policy.clear();
        assert!(!policy.has_pending());
    }
}
