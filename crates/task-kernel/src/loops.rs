//! Loop nodes.
//!
//! Both loops re-run a body sequence under a predicate. [`WhileLoop`] checks
//! before the first round, [`DoWhileLoop`] only after each round. The
//! predicate is re-checked each time the body finishes; when it still
//! holds, the loop reports `Continue` and the body starts its next round on
//! the following tick.

use crate::behavior::Behavior;
use crate::{Condition, Node, TickContext, TickResult};

/// Check-before loop: zero rounds if the predicate is false at session start.
pub struct WhileLoop {
    condition: Condition,
    body: Box<Node>,
    should_run: bool,
}

impl WhileLoop {
    pub(crate) fn new(condition: Condition, body: Vec<Node>) -> Self {
        Self {
            condition,
            body: Box::new(Node::sequence(body)),
            should_run: false,
        }
    }
}

impl Clone for WhileLoop {
    fn clone(&self) -> Self {
        Self {
            condition: self.condition.clone(),
            body: self.body.clone(),
            should_run: false,
        }
    }
}

impl Behavior for WhileLoop {
    fn init(&mut self) {
        self.should_run = (self.condition)();
    }

    fn step(&mut self, tick: &mut TickContext) -> TickResult {
        if !self.should_run {
            return TickResult::Finished;
        }

        (self.body.drive(tick) && !(self.condition)()).into()
    }

    fn on_cancel(&mut self) {
        self.body.cancel();
        self.on_finish();
    }
}

/// Check-after loop: always at least one round.
#[derive(Clone)]
pub struct DoWhileLoop {
    body: Box<Node>,
    condition: Condition,
}

impl DoWhileLoop {
    pub(crate) fn new(body: Vec<Node>, condition: Condition) -> Self {
        Self {
            body: Box::new(Node::sequence(body)),
            condition,
        }
    }
}

impl Behavior for DoWhileLoop {
    fn step(&mut self, tick: &mut TickContext) -> TickResult {
        (self.body.drive(tick) && !(self.condition)()).into()
    }

    fn on_cancel(&mut self) {
        self.body.cancel();
        self.on_finish();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn bump(count: &Arc<AtomicUsize>) -> Node {
        let count = Arc::clone(count);
        Node::action(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn below(count: &Arc<AtomicUsize>, limit: usize) -> impl Fn() -> bool + Send + Sync + 'static {
        let count = Arc::clone(count);
        move || count.load(Ordering::SeqCst) < limit
    }

    fn run_to_end(node: &mut Node) -> usize {
        node.start().unwrap();
        let mut ticks = 0;
        while node.running() {
            node.resume();
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn while_with_false_predicate_runs_zero_rounds() {
        let rounds = counter();
        let mut node = Node::while_loop(|| false, vec![bump(&rounds)]);

        assert_eq!(run_to_end(&mut node), 1);
        assert_eq!(rounds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn do_while_with_false_predicate_runs_one_round() {
        let rounds = counter();
        let mut node = Node::do_while(vec![bump(&rounds)], || false);

        assert_eq!(run_to_end(&mut node), 1);
        assert_eq!(rounds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn while_runs_one_round_per_tick_until_predicate_fails() {
        let rounds = counter();
        let mut node = Node::while_loop(below(&rounds, 3), vec![bump(&rounds)]);

        assert_eq!(run_to_end(&mut node), 3);
        assert_eq!(rounds.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn do_while_matches_while_once_predicate_starts_true() {
        let rounds = counter();
        let mut node = Node::do_while(vec![bump(&rounds)], below(&rounds, 3));

        assert_eq!(run_to_end(&mut node), 3);
        assert_eq!(rounds.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn body_spanning_ticks_is_followed_to_completion() {
        let rounds = counter();
        let mut node = Node::while_loop(below(&rounds, 2), vec![Node::delay(1), bump(&rounds)]);

        // Each round takes two ticks.
        assert_eq!(run_to_end(&mut node), 4);
        assert_eq!(rounds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cancel_reaches_in_flight_body() {
        let cancels = counter();
        let seen = Arc::clone(&cancels);
        let mut node = Node::while_loop(
            || true,
            vec![Node::delay(3).with_cancel_hook(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            })],
        );

        node.start().unwrap();
        node.resume();
        node.reset();

        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert!(!node.is_active());
    }
}
