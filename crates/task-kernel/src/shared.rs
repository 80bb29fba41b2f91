//! Thread-shared task handle.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{KernelError, Node, Result};

/// A [`Node`] that several threads may start, tick, stop or reset.
///
/// Each call holds the node's lock for its whole duration, so a tick never
/// interleaves with a stop or reset issued from elsewhere. Within a tick,
/// evaluation is still the single-threaded descent of [`Node::resume`].
#[derive(Clone)]
pub struct SharedTask {
    inner: Arc<Mutex<Node>>,
}

impl SharedTask {
    pub fn new(node: Node) -> Self {
        Self {
            inner: Arc::new(Mutex::new(node)),
        }
    }

    pub fn start(&self) -> Result<()> {
        self.lock()?.start()
    }

    pub fn resume(&self) -> Result<()> {
        self.lock()?.resume();
        Ok(())
    }

    pub fn stop(&self) -> Result<()> {
        self.lock()?.stop()
    }

    pub fn reset(&self) -> Result<()> {
        self.lock()?.reset();
        Ok(())
    }

    pub fn running(&self) -> Result<bool> {
        Ok(self.lock()?.running())
    }

    /// Runs `f` with exclusive access to the node.
    pub fn with<R>(&self, f: impl FnOnce(&mut Node) -> R) -> Result<R> {
        let mut node = self.lock()?;
        Ok(f(&mut node))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Node>> {
        self.inner.lock().map_err(|_| KernelError::LockPoisoned)
    }
}

impl From<Node> for SharedTask {
    fn from(node: Node) -> Self {
        Self::new(node)
    }
}
