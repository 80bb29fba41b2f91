//! Result of evaluating a node for one tick.

use crate::Node;

/// The outcome of one `step` of a node.
///
/// # Cooperative Semantics
///
/// Unlike a turn-based behavior that either succeeds or fails on the spot,
/// a node here may span many ticks:
/// - `Continue` keeps the node's run session open for the next tick
/// - `Finished` closes the session
/// - `Redirect` closes the session and hands the driver's slot to another node
#[derive(strum::IntoStaticStr)]
pub enum TickResult {
    /// The node has more work to do on a later tick.
    Continue,

    /// The node completed its work this tick.
    Finished,

    /// The node hands its slot over to `target`.
    ///
    /// Whoever is driving this node drives `target` in its place from the
    /// next time the slot is reached. Once `target` finishes, the slot
    /// reverts to the original node and the driver sees it as finished.
    Redirect(Box<Node>),
}

impl TickResult {
    /// Returns `true` if this result is `Finished`.
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, TickResult::Finished)
    }

    /// Returns `true` if this result is `Continue`.
    #[inline]
    pub fn is_continue(&self) -> bool {
        matches!(self, TickResult::Continue)
    }

    /// Returns `true` if this result hands the slot to another node.
    #[inline]
    pub fn is_redirect(&self) -> bool {
        matches!(self, TickResult::Redirect(_))
    }
}

impl From<bool> for TickResult {
    /// `true` means finished, `false` means keep going.
    #[inline]
    fn from(finished: bool) -> Self {
        if finished {
            TickResult::Finished
        } else {
            TickResult::Continue
        }
    }
}

impl std::fmt::Debug for TickResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickResult::Redirect(target) => f.debug_tuple("Redirect").field(target).finish(),
            other => f.write_str(other.into()),
        }
    }
}
