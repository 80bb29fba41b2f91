//! Per-tick evaluation context.
//!
//! The outermost node on which `resume()` is called creates one
//! [`TickContext`] per tick and threads it by `&mut` through every nested
//! `drive`. It carries the arbitration slot that jump rules anywhere in the
//! active tree compete for, so that exactly one claim survives the tick.

use tracing::trace;

use crate::Node;

/// A jump claim recorded in the arbitration slot.
struct JumpClaim {
    priority: i32,
    /// `None` for claims that only block lower priorities (return-back
    /// jumps and target-less rules).
    target: Option<Box<Node>>,
}

/// State shared by every node reached during a single tick.
#[derive(Default)]
pub struct TickContext {
    slot: Option<JumpClaim>,
}

impl TickContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a jump claim if it is at least as urgent as the one held.
    ///
    /// A claim overwrites the slot when its priority is greater than or
    /// equal to the held priority, so among equal priorities the claim
    /// evaluated last wins.
    ///
    /// Returns `true` if the claim now occupies the slot.
    pub(crate) fn claim(&mut self, priority: i32, target: Option<Box<Node>>) -> bool {
        if let Some(held) = &self.slot
            && held.priority > priority
        {
            trace!(priority, held = held.priority, "jump claim outranked");
            return false;
        }

        self.slot = Some(JumpClaim { priority, target });
        true
    }

    #[cfg(test)]
    fn claimed_priority(&self) -> Option<i32> {
        self.slot.as_ref().map(|claim| claim.priority)
    }

    /// Consumes the context, yielding the one-way jump target to install.
    pub(crate) fn into_jump_target(self) -> Option<Box<Node>> {
        self.slot.and_then(|claim| claim.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Option<Box<Node>> {
        Some(Box::new(Node::delay(0)))
    }

    #[test]
    fn first_claim_always_wins_empty_slot() {
        let mut tick = TickContext::new();
        assert!(tick.claim(-3, target()));
        assert_eq!(tick.claimed_priority(), Some(-3));
    }

    #[test]
    fn higher_priority_overwrites() {
        let mut tick = TickContext::new();
        assert!(tick.claim(5, target()));
        assert!(tick.claim(10, target()));
        assert!(!tick.claim(7, target()));
        assert_eq!(tick.claimed_priority(), Some(10));
    }

    #[test]
    fn equal_priority_later_claim_wins() {
        let mut tick = TickContext::new();
        assert!(tick.claim(4, target()));
        assert!(tick.claim(4, None));
        // The later target-less claim replaced the earlier target.
        assert!(tick.into_jump_target().is_none());
    }
}
