//! Tick-driven cooperative task kernel.
//!
//! This library describes a tree of steppable units of work (nodes) and
//! advances the whole tree by one discrete step per external call, across as
//! many calls as it takes, until the tree reports completion.
//!
//! - **Cooperative**: every step returns promptly; nothing is preempted
//! - **Single-threaded evaluation**: one tick is one recursive descent
//! - **Deterministic jumps**: competing jump requests anywhere in the active
//!   tree are arbitrated once per tick, by priority
//!
//! # Architecture
//!
//! - [`Node`]: the only entity; task, driver of its slot, and (when ticked
//!   from the outside) owner of the tick
//! - [`TickResult`]: Continue, Finished, or Redirect
//! - [`TickContext`]: per-tick state holding the jump arbitration slot
//! - Leaves: closures ([`Node::action`], [`Node::task`]), [`Node::delay`],
//!   [`Node::external`]
//! - Composites: [`Sequence`], [`If`] conditionals, [`WhileLoop`],
//!   [`DoWhileLoop`], [`Jump`]
//! - [`SharedTask`]: a node driven from several threads
//!
//! # Example
//!
//! ```rust
//! use task_kernel::builder::{action, delay, sequence};
//!
//! let mut tree = sequence(vec![delay(1), action(|| println!("done"))]);
//! tree.start().unwrap();
//! while tree.running() {
//!     tree.resume();
//! }
//! ```

mod behavior;
pub mod builder;
pub mod conditional;
pub mod context;
pub mod error;
pub mod jump;
pub mod leaf;
pub mod loops;
pub mod node;
pub mod sequence;
pub mod shared;
pub mod tick;

// Re-export core types for ergonomic API
pub use conditional::{Condition, Conditional, If};
pub use context::TickContext;
pub use error::{KernelError, Result};
pub use jump::{Jump, JumpMode};
pub use leaf::{Closure, External, ExternalLoop, Timer};
pub use loops::{DoWhileLoop, WhileLoop};
pub use node::{CancelHook, Node};
pub use sequence::Sequence;
pub use shared::SharedTask;
pub use tick::TickResult;
