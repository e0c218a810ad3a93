//! Deferred reclamation of replaced graphs.
//!
//! The audio thread may still be inside `process` on a graph at the moment
//! the control thread publishes its replacement. Dropping the old graph is
//! therefore never left to whoever releases the last reference; replaced
//! graphs are parked here and freed by the control thread once nobody else
//! holds them.

use std::sync::Arc;

/// Control-side holding area for values that may still be shared.
#[derive(Debug)]
pub struct RetireList<T> {
    retired: Vec<Arc<T>>,
}

impl<T> Default for RetireList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RetireList<T> {
    /// Empty list.
    pub fn new() -> Self {
        Self {
            retired: Vec::new(),
        }
    }

    /// Park a value until it can be dropped.
    pub fn retire(&mut self, value: Arc<T>) {
        self.retired.push(value);
    }

    /// Drop every parked value this list holds the last reference to.
    ///
    /// Returns the number of values dropped.
    pub fn collect(&mut self) -> usize {
        let before = self.retired.len();
        self.retired.retain(|value| Arc::strong_count(value) > 1);
        let dropped = before - self.retired.len();
        if dropped > 0 {
            tracing::debug!(
                "retire_collect: dropped {dropped}, {} still in use",
                self.retired.len()
            );
        }
        dropped
    }

    /// Number of values still parked.
    pub fn len(&self) -> usize {
        self.retired.len()
    }

    /// True when nothing is parked.
    pub fn is_empty(&self) -> bool {
        self.retired.is_empty()
    }
}
