//! Change notification for hosts and editors.

use std::fmt;
use std::sync::Arc;

use rackgraph_core::{ConfigNode, Topology};

/// Handle returned by
/// [`ChainController::add_listener`](crate::ChainController::add_listener).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// What is live after a successful load.
#[derive(Debug, Clone)]
pub struct ChainSnapshot {
    /// Number of successful loads so far, this one included.
    pub generation: u64,
    /// Tree the live graph was built from.
    pub config: Arc<ConfigNode>,
    /// Shape of the live graph.
    pub topology: Topology,
}

/// Observer of chain replacements.
///
/// Called once per successful load, on the thread that loaded, after the new
/// graph is live and after the controller's internal lock is released. The
/// listener may therefore call back into the controller.
pub trait ChainListener: Send + Sync {
    /// A new graph has been published.
    fn chain_changed(&self, snapshot: &ChainSnapshot);
}

impl<F> ChainListener for F
where
    F: Fn(&ChainSnapshot) + Send + Sync,
{
    fn chain_changed(&self, snapshot: &ChainSnapshot) {
        self(snapshot);
    }
}

/// Registered listeners, in registration order.
#[derive(Default)]
pub(crate) struct ListenerSet {
    listeners: Vec<(ListenerId, Arc<dyn ChainListener>)>,
    next_id: u64,
}

impl ListenerSet {
    pub(crate) fn add(&mut self, listener: Arc<dyn ChainListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Clone out the current listeners so they can be called without a lock.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn ChainListener>> {
        self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
    }
}
