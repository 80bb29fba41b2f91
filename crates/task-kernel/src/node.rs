//! The node kernel.
//!
//! A [`Node`] is at the same time:
//! - a **task**: a unit of work some ancestor drives one tick at a time,
//! - a **machine**: the driver of whichever node currently occupies its
//!   slot (itself by default, or the target of a redirect),
//! - a **manager**: when `resume()` is called on it from the outside, the
//!   owner of the tick's [`TickContext`] and of the top-level subtree that a
//!   one-way jump may replace.
//!
//! All three roles live in this one type so that callers, task authors and
//! composite implementations never have to care which one is in play.

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace, warn};

use crate::behavior::Behavior;
use crate::conditional::Conditional;
use crate::jump::Jump;
use crate::leaf::{Closure, External, ExternalLoop, Timer};
use crate::loops::{DoWhileLoop, WhileLoop};
use crate::sequence::Sequence;
use crate::{KernelError, Result, TickContext, TickResult};

/// Owner-supplied notification run right after a node is cancelled.
pub type CancelHook = Arc<dyn Fn() + Send + Sync>;

/// The closed set of node variants.
#[derive(Clone, strum::IntoStaticStr)]
pub(crate) enum NodeKind {
    Closure(Closure),
    Timer(Timer),
    Sequence(Sequence),
    Conditional(Conditional),
    While(WhileLoop),
    DoWhile(DoWhileLoop),
    Jump(Jump),
    External(External),
}

impl NodeKind {
    fn behavior(&mut self) -> &mut dyn Behavior {
        match self {
            NodeKind::Closure(node) => node,
            NodeKind::Timer(node) => node,
            NodeKind::Sequence(node) => node,
            NodeKind::Conditional(node) => node,
            NodeKind::While(node) => node,
            NodeKind::DoWhile(node) => node,
            NodeKind::Jump(node) => node,
            NodeKind::External(node) => node,
        }
    }
}

/// What a node evaluates when it is driven.
enum Driving {
    /// The node runs its own behavior.
    SelfDriven,
    /// A redirect replaced the node's slot with another node.
    Redirected(Box<Node>),
}

/// A steppable unit of work.
///
/// Nodes are built fully formed (children supplied at construction) and then
/// advanced by calling [`resume`](Node::resume) once per external tick after
/// [`start`](Node::start). See the crate docs for the evaluation model.
///
/// # Copying
///
/// `Clone` copies the *definition* of a node, never its execution state: a
/// clone is always idle and only carries the cancel hook over. Use
/// [`fork`](Node::fork) to copy while also severing the source's open
/// session, and `clone_from` to overwrite a node (its open session is
/// cancelled first).
pub struct Node {
    kind: NodeKind,
    session_open: bool,
    driving: Driving,
    running: bool,
    installed: Option<Box<Node>>,
    cancel_hook: Option<CancelHook>,
}

impl Node {
    pub(crate) fn from_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            session_open: false,
            driving: Driving::SelfDriven,
            running: false,
            installed: None,
            cancel_hook: None,
        }
    }

    /// A leaf that calls `func` once and finishes in the same tick.
    pub fn action<F>(func: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::from_kind(NodeKind::Closure(Closure::new(move || {
            func();
            true
        })))
    }

    /// A leaf that calls `func` every tick until it returns `true`.
    pub fn task<F>(func: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::from_kind(NodeKind::Closure(Closure::new(func)))
    }

    /// A leaf that stays unfinished for `ticks` steps and finishes on the next.
    pub fn delay(ticks: u32) -> Self {
        Self::from_kind(NodeKind::Timer(Timer::new(ticks)))
    }

    /// Runs `children` one after another.
    pub fn sequence(children: Vec<Node>) -> Self {
        Sequence::new(children).into()
    }

    /// Re-runs `body` while `condition` holds, checking before each round.
    pub fn while_loop<F>(condition: F, body: Vec<Node>) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::from_kind(NodeKind::While(WhileLoop::new(Arc::new(condition), body)))
    }

    /// Runs `body` once, then again while `condition` holds.
    pub fn do_while<F>(body: Vec<Node>, condition: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::from_kind(NodeKind::DoWhile(DoWhileLoop::new(body, Arc::new(condition))))
    }

    /// Wraps an object with its own start/running/stop cycle.
    ///
    /// The handle is shared: clones of the returned node drive the same
    /// object.
    pub fn external<L>(target: Arc<Mutex<L>>) -> Self
    where
        L: ExternalLoop + 'static,
    {
        Self::from_kind(NodeKind::External(External::new(target)))
    }

    /// Sets the notification run after this node is cancelled.
    pub fn set_cancel_hook<F>(&mut self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.cancel_hook = Some(Arc::new(hook));
    }

    /// Builder form of [`set_cancel_hook`](Node::set_cancel_hook).
    #[must_use]
    pub fn with_cancel_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.set_cancel_hook(hook);
        self
    }

    /// Name of this node's variant, for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        (&self.kind).into()
    }

    /// Returns `true` while this node has an open run session.
    pub fn is_active(&self) -> bool {
        self.session_open
    }

    /// Returns `true` if a redirect currently occupies this node's slot.
    pub fn is_redirected(&self) -> bool {
        matches!(self.driving, Driving::Redirected(_))
    }

    /// Copies this node's definition, severing any open session first.
    ///
    /// Unlike `clone`, which cannot touch the source, this cancels the
    /// source's session (and with it the active child chain) before the copy
    /// is taken. Both nodes are idle afterwards.
    pub fn fork(&mut self) -> Node {
        self.reset();
        self.clone()
    }

    // ===== external surface =====

    /// Marks this node as running so that [`resume`](Node::resume) ticks it.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            warn!(kind = self.kind(), "start() a task which has already started");
            return Err(KernelError::AlreadyRunning);
        }

        self.running = true;
        Ok(())
    }

    /// Performs one tick if running.
    ///
    /// Drives the top-level node (this node, or the target of an earlier
    /// one-way jump), then applies the jump that won this tick's arbitration,
    /// if any. When the top-level node finishes without a jump pre-empting
    /// it, the node stops running.
    pub fn resume(&mut self) {
        if !self.running {
            return;
        }

        let mut tick = TickContext::new();
        let finished = match self.installed.as_mut() {
            Some(top) => top.drive(&mut tick),
            None => self.drive(&mut tick),
        };

        if let Some(target) = tick.into_jump_target() {
            debug!(
                from = self.top_kind(),
                to = target.kind(),
                "one-way jump replaces the active tree"
            );
            self.cancel_top();
            self.installed = Some(target);
        } else if finished {
            trace!(kind = self.kind(), "task finished");
            self.running = false;
            self.installed = None;
        }
    }

    /// Marks this node as stopped, keeping its session for a later resume.
    pub fn stop(&mut self) -> Result<()> {
        if !self.running {
            warn!(kind = self.kind(), "stop() a task which has already stopped");
            return Err(KernelError::AlreadyStopped);
        }

        self.running = false;
        Ok(())
    }

    /// Forcibly cancels any open session, whether running or not.
    ///
    /// A tree installed by a one-way jump is cancelled and discarded too,
    /// so the next tick starts this node's own tree from the beginning.
    pub fn reset(&mut self) {
        self.cancel();
        if let Some(mut top) = self.installed.take() {
            top.cancel();
        }
    }

    /// Returns `true` between [`start`](Node::start) and completion or
    /// [`stop`](Node::stop).
    pub fn running(&self) -> bool {
        self.running
    }

    // ===== evaluation =====

    /// Advances whatever occupies this node's slot by one tick.
    ///
    /// Returns `true` once the slot's occupant finished; the slot then
    /// reverts to this node itself.
    pub(crate) fn drive(&mut self, tick: &mut TickContext) -> bool {
        let result = if let Driving::Redirected(target) = &mut self.driving {
            target.run_step(tick)
        } else {
            self.run_step(tick)
        };

        match result {
            TickResult::Redirect(target) => {
                debug!(from = self.kind(), to = target.kind(), "slot redirected");
                self.driving = Driving::Redirected(target);
                false
            }
            TickResult::Continue => false,
            TickResult::Finished => {
                self.driving = Driving::SelfDriven;
                true
            }
        }
    }

    /// Runs this node's own hooks for one tick, managing its session.
    fn run_step(&mut self, tick: &mut TickContext) -> TickResult {
        if !self.session_open {
            trace!(kind = self.kind(), "session opened");
            self.kind.behavior().init();
            self.session_open = true;
        }

        let result = self.kind.behavior().step(tick);

        // Finishing and handing the slot over both close the session.
        if !result.is_continue() {
            self.session_open = false;
            trace!(kind = self.kind(), "session finished");
            self.kind.behavior().on_finish();
        }

        result
    }

    /// Forcibly closes whatever session occupies this node's slot.
    ///
    /// No-op on idle nodes: no hook runs unless a session is open.
    pub(crate) fn cancel(&mut self) {
        match std::mem::replace(&mut self.driving, Driving::SelfDriven) {
            Driving::Redirected(mut target) => target.cancel(),
            Driving::SelfDriven => self.cancel_session(),
        }
    }

    fn cancel_session(&mut self) {
        if !self.session_open {
            return;
        }

        self.session_open = false;
        trace!(kind = self.kind(), "session cancelled");

        let behavior = self.kind.behavior();
        let hook = self.cancel_hook.as_deref();
        contain_collaborator_panic(|| {
            behavior.on_cancel();
            if let Some(hook) = hook {
                hook();
            }
        });
    }

    fn cancel_top(&mut self) {
        match self.installed.as_mut() {
            Some(top) => top.cancel(),
            None => self.cancel(),
        }
    }

    fn top_kind(&self) -> &'static str {
        self.installed.as_ref().map_or(self.kind(), |top| top.kind())
    }
}

/// Runs cancellation-path collaborator code.
///
/// Release builds keep teardown non-panicking: a panic is caught here and
/// logged. Debug builds let it propagate to aid diagnosis.
#[cfg(not(debug_assertions))]
fn contain_collaborator_panic<F: FnOnce()>(f: F) {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        let reason = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string panic payload");
        tracing::error!(reason, "error occurred during a task's cancellation");
    }
}

#[cfg(debug_assertions)]
fn contain_collaborator_panic<F: FnOnce()>(f: F) {
    f();
}

impl Clone for Node {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            session_open: false,
            driving: Driving::SelfDriven,
            running: false,
            installed: None,
            cancel_hook: self.cancel_hook.clone(),
        }
    }

    /// Overwrites this node with a copy of `source`'s definition.
    ///
    /// The session being overwritten is cancelled first.
    fn clone_from(&mut self, source: &Self) {
        self.reset();
        *self = source.clone();
    }
}

/// Dropping a node cancels its open session.
///
/// While the thread is already unwinding, cancellation is skipped: a panic
/// from a hook at that point would abort the process.
impl Drop for Node {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        self.cancel();
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind())
            .field("session_open", &self.session_open)
            .field("redirected", &self.is_redirected())
            .field("running", &self.running)
            .field("installed", &self.installed)
            .finish()
    }
}

impl From<Sequence> for Node {
    fn from(sequence: Sequence) -> Self {
        Self::from_kind(NodeKind::Sequence(sequence))
    }
}

impl From<Conditional> for Node {
    fn from(conditional: Conditional) -> Self {
        Self::from_kind(NodeKind::Conditional(conditional))
    }
}

impl From<Jump> for Node {
    fn from(jump: Jump) -> Self {
        Self::from_kind(NodeKind::Jump(jump))
    }
}
