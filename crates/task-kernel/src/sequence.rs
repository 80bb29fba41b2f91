//! Sequence node.
//!
//! A [`Sequence`] runs a fixed, ordered list of children to completion, one
//! active child at a time. It is the body type of every other composite:
//! conditional branches, loop bodies, jump bodies and jump targets.

use crate::behavior::Behavior;
use crate::{Node, TickContext, TickResult};

/// Executes child nodes in order, each to completion.
///
/// # Semantics
///
/// Each tick, the child under the cursor is driven:
/// - If it finishes, the cursor advances and the next child is driven
///   **within the same tick**, so a run of instant children collapses into
///   a single external tick
/// - If it does not finish (or redirects its slot), the sequence reports
///   `Continue` and picks up at the same child next tick
/// - Once the cursor is past the last child, the sequence reports `Finished`
pub struct Sequence {
    children: Vec<Node>,
    cursor: usize,
}

impl Sequence {
    /// Creates a new sequence with the given children.
    ///
    /// An empty sequence is valid and finishes on its first step.
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            cursor: 0,
        }
    }
}

impl Clone for Sequence {
    fn clone(&self) -> Self {
        Self::new(self.children.clone())
    }
}

impl Behavior for Sequence {
    fn init(&mut self) {
        self.cursor = 0;
    }

    fn step(&mut self, tick: &mut TickContext) -> TickResult {
        while let Some(child) = self.children.get_mut(self.cursor) {
            if !child.drive(tick) {
                return TickResult::Continue;
            }
            self.cursor += 1;
        }

        TickResult::Finished
    }

    fn on_cancel(&mut self) {
        if let Some(child) = self.children.get_mut(self.cursor) {
            child.cancel();
        }
        self.on_finish();
    }
}
