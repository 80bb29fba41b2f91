//! Leaf nodes.
//!
//! Leaves drive nothing but themselves: [`Closure`] delegates to a callable,
//! [`Timer`] counts ticks, and [`External`] follows an outside object with
//! its own start/running/stop cycle.

use std::sync::{Arc, Mutex, PoisonError};

use crate::behavior::Behavior;
use crate::{TickContext, TickResult};

/// Work function of a closure leaf. `true` means finished.
pub(crate) type Work = Arc<dyn Fn() -> bool + Send + Sync>;

/// Calls a function every tick until it reports completion.
#[derive(Clone)]
pub struct Closure {
    work: Work,
}

impl Closure {
    pub(crate) fn new<F>(work: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            work: Arc::new(work),
        }
    }
}

impl Behavior for Closure {
    fn step(&mut self, _tick: &mut TickContext) -> TickResult {
        (self.work)().into()
    }
}

/// Stays unfinished for a fixed number of steps.
///
/// `Timer::new(n)` reports `Continue` on its first `n` steps of a session
/// and `Finished` on step `n + 1`; `Timer::new(0)` finishes immediately.
pub struct Timer {
    delay: u32,
    count: u32,
}

impl Timer {
    pub(crate) fn new(delay: u32) -> Self {
        Self { delay, count: 0 }
    }
}

impl Clone for Timer {
    fn clone(&self) -> Self {
        Self::new(self.delay)
    }
}

impl Behavior for Timer {
    fn init(&mut self) {
        self.count = 0;
    }

    fn step(&mut self, _tick: &mut TickContext) -> TickResult {
        self.count = self.count.saturating_add(1);
        (self.count > self.delay).into()
    }
}

/// An object that runs on its own once started.
///
/// Wrapped by [`crate::Node::external`], it is started when the node's
/// session opens, polled every tick, and stopped if the node is cancelled.
pub trait ExternalLoop: Send {
    fn start(&mut self);

    fn running(&self) -> bool;

    fn stop(&mut self);
}

/// Follows an [`ExternalLoop`] until it stops on its own.
#[derive(Clone)]
pub struct External {
    target: Arc<Mutex<dyn ExternalLoop>>,
}

impl External {
    pub(crate) fn new(target: Arc<Mutex<dyn ExternalLoop>>) -> Self {
        Self { target }
    }

    fn with_target<R>(&self, f: impl FnOnce(&mut dyn ExternalLoop) -> R) -> R {
        // The target's own state stays meaningful after a panic elsewhere.
        let mut guard = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}

impl Behavior for External {
    fn init(&mut self) {
        self.with_target(|target| target.start());
    }

    fn step(&mut self, _tick: &mut TickContext) -> TickResult {
        (!self.with_target(|target| target.running())).into()
    }

    fn on_cancel(&mut self) {
        self.with_target(|target| target.stop());
    }
}
