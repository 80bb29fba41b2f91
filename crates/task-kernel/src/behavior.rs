//! Per-variant step contract.
//!
//! This module defines the [`Behavior`] trait, implemented by every node
//! variant. The kernel in [`crate::node`] decides *when* each hook runs
//! (session bookkeeping, redirects, cancellation); a variant only decides
//! *what* happens.

use crate::{TickContext, TickResult};

/// Hooks of one node variant.
pub(crate) trait Behavior {
    /// Called once when a run session opens, right before the first `step`.
    fn init(&mut self) {}

    /// Advance this node by one tick.
    ///
    /// # Arguments
    ///
    /// * `tick` - Context of the current tick. Composites pass it unchanged
    ///   to the children they drive; jump nodes claim its arbitration slot.
    ///
    /// # Returns
    ///
    /// - `TickResult::Continue` if the node needs more ticks
    /// - `TickResult::Finished` if it completed
    /// - `TickResult::Redirect` to hand its slot to another node
    fn step(&mut self, tick: &mut TickContext) -> TickResult;

    /// Called once when the session closes through completion or redirect.
    fn on_finish(&mut self) {}

    /// Called once when the session is forcibly closed.
    ///
    /// Composites must cancel their active child before finishing themselves.
    fn on_cancel(&mut self) {
        self.on_finish();
    }
}
