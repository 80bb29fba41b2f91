//! Builder utilities for ergonomic task tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! task trees. Instead of writing `Node::sequence(vec![...])` or negating
//! predicates by hand, you can use shorter functions like `sequence(vec![...])`
//! and `until(done, vec![...])`.

use crate::{If, Jump, Node};

/// Creates a leaf that runs `func` once. Shorthand for [`Node::action`].
#[inline]
pub fn action<F>(func: F) -> Node
where
    F: Fn() + Send + Sync + 'static,
{
    Node::action(func)
}

/// Creates a leaf that runs `func` each tick until it returns `true`.
/// Shorthand for [`Node::task`].
#[inline]
pub fn task<F>(func: F) -> Node
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Node::task(func)
}

/// Creates a timer leaf. Shorthand for [`Node::delay`].
#[inline]
pub fn delay(ticks: u32) -> Node {
    Node::delay(ticks)
}

/// Creates a sequence node. Shorthand for [`Node::sequence`].
#[inline]
pub fn sequence(children: Vec<Node>) -> Node {
    Node::sequence(children)
}

/// Starts a conditional chain. Shorthand for [`If::new`].
#[inline]
pub fn when<F>(condition: F, body: Vec<Node>) -> If
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    If::new(condition, body)
}

/// Creates a check-before loop. Shorthand for [`Node::while_loop`].
#[inline]
pub fn while_<F>(condition: F, body: Vec<Node>) -> Node
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Node::while_loop(condition, body)
}

/// Creates a check-before loop that runs while `condition` is false.
#[inline]
pub fn until<F>(condition: F, body: Vec<Node>) -> Node
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Node::while_loop(move || !condition(), body)
}

/// Creates a check-after loop. Shorthand for [`Node::do_while`].
#[inline]
pub fn do_while<F>(body: Vec<Node>, condition: F) -> Node
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Node::do_while(body, condition)
}

/// Creates a check-after loop that repeats while `condition` is false.
#[inline]
pub fn do_until<F>(body: Vec<Node>, condition: F) -> Node
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Node::do_while(body, move || !condition())
}

/// Creates a node that blocks until `condition` holds.
///
/// Finishes on its first tick if `condition` already holds, otherwise on the
/// first tick where it is observed true.
#[inline]
pub fn wait<F>(condition: F) -> Node
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    until(condition, Vec::new())
}

/// Starts a jump node around `body`. Shorthand for [`Jump::during`].
#[inline]
pub fn during(body: Vec<Node>) -> Jump {
    Jump::during(body)
}
