//! Non-local jump node.
//!
//! A [`Jump`] runs a main body while watching a registry of rules. After the
//! body's step each tick, the registry is searched from the highest priority
//! down (registration order within a priority) and the first rule whose
//! predicate holds competes for the tick's arbitration slot.
//!
//! # Modes
//!
//! - [`JumpMode::OneWay`]: the claim carries the rule's target. If it still
//!   holds the slot when the whole tick has been evaluated, the outermost
//!   driver cancels its entire active tree and installs the target instead.
//! - [`JumpMode::ReturnBack`]: the claim carries no target; it only blocks
//!   lower-priority claims. If it wins the slot at the moment it is made, the
//!   main body is cancelled and the jump node redirects its own slot to the
//!   target. When the target finishes, whoever drives the jump node sees it
//!   as finished and carries on.
//!
//! Rules without a target still claim the slot, suppressing lower-priority
//! jumps for that tick without doing anything themselves.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::behavior::Behavior;
use crate::{Condition, Node, TickContext, TickResult};

/// How a matched rule takes effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum JumpMode {
    /// Replace the whole active tree once the tick completes.
    OneWay,
    /// Replace only this jump node's slot, immediately.
    ReturnBack,
}

#[derive(Clone)]
struct JumpRule {
    condition: Condition,
    mode: JumpMode,
    target: Option<Node>,
}

/// A rule whose predicate held this tick.
struct Matched<'a> {
    priority: i32,
    rule: &'a JumpRule,
}

/// Main body plus priority-ordered jump rules.
pub struct Jump {
    body: Box<Node>,
    rules: BTreeMap<i32, Vec<JumpRule>>,
}

impl Jump {
    /// Starts a jump node around `body`, with no rules yet.
    pub fn during(body: Vec<Node>) -> Self {
        Self {
            body: Box::new(Node::sequence(body)),
            rules: BTreeMap::new(),
        }
    }

    /// Adds a one-way rule: jump the whole tree to `target` when `condition`
    /// holds.
    #[must_use]
    pub fn jump_if<F>(self, priority: i32, condition: F, target: Vec<Node>) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.rule(priority, condition, JumpMode::OneWay, Some(target))
    }

    /// Adds a return-back rule: run `target` in place of this node when
    /// `condition` holds, then continue after this node.
    #[must_use]
    pub fn jump_back_if<F>(self, priority: i32, condition: F, target: Vec<Node>) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.rule(priority, condition, JumpMode::ReturnBack, Some(target))
    }

    /// Adds a target-less rule that only blocks lower-priority jumps.
    #[must_use]
    pub fn suppress_if<F>(self, priority: i32, condition: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.rule(priority, condition, JumpMode::OneWay, None)
    }

    /// Adds a rule with an explicit mode and optional target.
    #[must_use]
    pub fn rule<F>(
        mut self,
        priority: i32,
        condition: F,
        mode: JumpMode,
        target: Option<Vec<Node>>,
    ) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.rules.entry(priority).or_default().push(JumpRule {
            condition: Arc::new(condition),
            mode,
            target: target.map(Node::sequence),
        });
        self
    }

    #[cfg(test)]
    fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    fn find_match(&self) -> Option<Matched<'_>> {
        self.rules.iter().rev().find_map(|(&priority, tier)| {
            tier.iter()
                .find(|rule| (rule.condition)())
                .map(|rule| Matched { priority, rule })
        })
    }
}

impl Clone for Jump {
    fn clone(&self) -> Self {
        Self {
            body: self.body.clone(),
            rules: self.rules.clone(),
        }
    }
}

impl Behavior for Jump {
    fn step(&mut self, tick: &mut TickContext) -> TickResult {
        let result = TickResult::from(self.body.drive(tick));

        let Some(Matched { priority, rule }) = self.find_match() else {
            return result;
        };
        // Each firing runs a fresh copy of the target.
        let target = rule.target.as_ref().map(|target| Box::new(target.clone()));
        let has_target = target.is_some();
        let mode = rule.mode;

        match mode {
            JumpMode::ReturnBack => {
                if tick.claim(priority, None)
                    && let Some(target) = target
                {
                    debug!(priority, "return-back jump taken");
                    self.body.cancel();
                    return TickResult::Redirect(target);
                }
            }
            JumpMode::OneWay => {
                if tick.claim(priority, target) && has_target {
                    debug!(priority, "one-way jump claimed");
                    return TickResult::Continue;
                }
            }
        }

        result
    }

    fn on_cancel(&mut self) {
        self.body.cancel();
        self.on_finish();
    }
}
