//! Conditional node.
//!
//! A [`Conditional`] holds an ordered list of `(predicate, body)` branches
//! and commits to the first branch whose predicate holds when its run
//! session opens. Use [`If`] to assemble one.

use std::sync::Arc;

use crate::behavior::Behavior;
use crate::{Node, TickContext, TickResult};

/// Predicate consulted by conditionals, loops and jump rules.
pub type Condition = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone)]
struct Branch {
    condition: Condition,
    body: Node,
}

/// Runs the first branch whose predicate held at session start.
///
/// # Semantics
///
/// - Predicates are evaluated in order, once, when the session opens
/// - The chosen branch is fixed for the rest of the session, even if the
///   predicates would now answer differently
/// - If no predicate held, the node finishes on its first step
pub struct Conditional {
    branches: Vec<Branch>,
    selected: Option<usize>,
}

impl Conditional {
    fn new(branches: Vec<Branch>) -> Self {
        Self {
            branches,
            selected: None,
        }
    }
}

impl Clone for Conditional {
    fn clone(&self) -> Self {
        Self::new(self.branches.clone())
    }
}

impl Behavior for Conditional {
    fn init(&mut self) {
        self.selected = self
            .branches
            .iter()
            .position(|branch| (branch.condition)());
    }

    fn step(&mut self, tick: &mut TickContext) -> TickResult {
        match self.selected.and_then(|index| self.branches.get_mut(index)) {
            Some(branch) => branch.body.drive(tick).into(),
            None => TickResult::Finished,
        }
    }

    fn on_cancel(&mut self) {
        if let Some(branch) = self.selected.and_then(|index| self.branches.get_mut(index)) {
            branch.body.cancel();
        }
        self.on_finish();
    }
}

/// Builder for [`Conditional`] nodes.
///
/// ```rust,ignore
/// use task_kernel::If;
///
/// let node: Node = If::new(is_night, vec![light_torch()])
///     .else_if(is_raining, vec![open_umbrella()])
///     .otherwise(vec![walk()]);
/// ```
pub struct If {
    branches: Vec<Branch>,
}

impl If {
    /// Starts a chain with its first branch.
    pub fn new<F>(condition: F, body: Vec<Node>) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            branches: Vec::new(),
        }
        .else_if(condition, body)
    }

    /// Appends a branch tried when all earlier predicates were false.
    #[must_use]
    pub fn else_if<F>(mut self, condition: F, body: Vec<Node>) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.branches.push(Branch {
            condition: Arc::new(condition),
            body: Node::sequence(body),
        });
        self
    }

    /// Closes the chain with a branch taken when nothing else matched.
    pub fn otherwise(self, body: Vec<Node>) -> Node {
        self.else_if(|| true, body).into()
    }
}

impl From<If> for Node {
    fn from(chain: If) -> Self {
        Conditional::new(chain.branches).into()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    fn flag(value: bool) -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(value))
    }

    fn reads(flag: &Arc<AtomicBool>) -> impl Fn() -> bool + Send + Sync + 'static {
        let flag = Arc::clone(flag);
        move || flag.load(Ordering::SeqCst)
    }

    fn record(log: &Arc<Mutex<Vec<&'static str>>>, entry: &'static str) -> Node {
        let log = Arc::clone(log);
        Node::action(move || log.lock().unwrap().push(entry))
    }

    #[test]
    fn first_true_branch_runs() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut node = If::new(|| false, vec![record(&log, "first")])
            .else_if(|| true, vec![record(&log, "second")])
            .otherwise(vec![record(&log, "fallback")]);

        node.start().unwrap();
        node.resume();

        assert_eq!(*log.lock().unwrap(), vec!["second"]);
        assert!(!node.running());
    }

    #[test]
    fn no_match_finishes_immediately() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut node: Node = If::new(|| false, vec![record(&log, "never")]).into();

        node.start().unwrap();
        node.resume();

        assert!(log.lock().unwrap().is_empty());
        assert!(!node.running());
    }

    #[test]
    fn selection_is_fixed_for_the_session() {
        let go = flag(true);
        let done = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&done);
        let mut node: Node = If::new(
            reads(&go),
            vec![
                Node::delay(2),
                Node::action(move || {
                    seen.fetch_add(1, Ordering::SeqCst);
                }),
            ],
        )
        .into();

        node.start().unwrap();
        node.resume();
        go.store(false, Ordering::SeqCst);
        node.resume();
        node.resume();

        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert!(!node.running());

        // A new session re-evaluates the predicate.
        node.start().unwrap();
        node.resume();
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert!(!node.running());
    }

    #[test]
    fn cancel_reaches_selected_branch() {
        let cancels = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&cancels);
        let mut node: Node = If::new(
            || true,
            vec![Node::delay(5).with_cancel_hook(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            })],
        )
        .into();

        node.start().unwrap();
        node.resume();
        node.reset();

        assert_eq!(cancels.load(Ordering::SeqCst), 1);
    }
}
