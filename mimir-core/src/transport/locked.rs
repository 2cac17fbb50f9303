//! Unbounded mutex-guarded FIFO for the naive pipeline.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// A single mutex guards both ends; it is held only for the queue operation
/// itself, never for downstream work.
pub struct LockedQueue<T> {
    inner: Mutex<VecDeque<T>>,
}

impl<T> LockedQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    /// Unbounded: never fails, never drops.
    pub fn push(&self, v: T) {
        self.inner.lock().push_back(v);
    }

    pub fn pop(&self) -> Option<T> {
        self.inner.lock().pop_front()
    }

    pub fn depth(&self) -> usize {
        self.inner.lock().len()
    }
}

impl<T> Default for LockedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
