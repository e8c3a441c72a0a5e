//! Progress reporting
//!
//! Explicit observer registration instead of ambient UI events: anything
//! that wants claim progress registers here and receives every transition.

use crate::phase::ClaimPhase;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use vestflow_types::{AttemptId, TxSignature};

/// One phase transition of a claim attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Attempt this update belongs to
    pub attempt_id: AttemptId,
    /// Phase entered
    pub phase: ClaimPhase,
    /// Progress after the transition, 0..=100
    pub percent: u8,
    /// Fee signature, once known
    pub fee_signature: Option<TxSignature>,
}

/// Receives claim progress updates
pub trait ProgressObserver: Send + Sync {
    /// Called on every phase transition, including the failing one
    fn on_progress(&self, update: &ProgressUpdate);
}

/// Registered observers
#[derive(Default)]
pub(crate) struct ObserverSet {
    observers: RwLock<Vec<Arc<dyn ProgressObserver>>>,
}

impl ObserverSet {
    pub(crate) fn register(&self, observer: Arc<dyn ProgressObserver>) {
        self.observers.write().push(observer);
    }

    pub(crate) fn notify(&self, update: &ProgressUpdate) {
        for observer in self.observers.read().iter() {
            observer.on_progress(update);
        }
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("count", &self.observers.read().len())
            .finish()
    }
}

/// Observer that forwards updates into a channel
///
/// Convenient for UIs and tests that consume progress asynchronously. A
/// closed receiver is ignored; progress must never fail the claim.
#[derive(Debug)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<ProgressUpdate>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end
    #[must_use]
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ProgressUpdate>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { sender }), receiver)
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        let _ = self.sender.send(update.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_reaches_all_observers() {
        let set = ObserverSet::default();
        let (observer_a, mut rx_a) = ChannelObserver::new();
        let (observer_b, mut rx_b) = ChannelObserver::new();
        set.register(observer_a);
        set.register(observer_b);

        let update = ProgressUpdate {
            attempt_id: AttemptId::new(),
            phase: ClaimPhase::Preparing,
            percent: 10,
            fee_signature: None,
        };
        set.notify(&update);

        assert_eq!(rx_a.try_recv().unwrap(), update);
        assert_eq!(rx_b.try_recv().unwrap(), update);
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let set = ObserverSet::default();
        let (observer, rx) = ChannelObserver::new();
        set.register(observer);
        drop(rx);

        set.notify(&ProgressUpdate {
            attempt_id: AttemptId::new(),
            phase: ClaimPhase::Success,
            percent: 100,
            fee_signature: None,
        });
        // No panic is the assertion
    }
}
