//! State container that applies events through the root reducer.

use crate::reducer::{reduce, ClientEvent};
use crate::state::ClientState;
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the current [`ClientState`] and notifies subscribers on change.
///
/// Cloning a store gives another handle to the same state. Dispatches are
/// applied one at a time in call order.
#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<ClientState>>,
}

impl Store {
    pub fn new(initial: ClientState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Apply an event to the state
    pub fn dispatch(&self, event: impl Into<ClientEvent>) {
        let event = event.into();
        tracing::trace!(?event, "Dispatching");
        self.tx
            .send_modify(|state| *state = reduce(std::mem::take(state), &event));
    }

    /// Receiver that wakes on every dispatch
    pub fn subscribe(&self) -> watch::Receiver<ClientState> {
        self.tx.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ClientState {
        self.tx.borrow().clone()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(ClientState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::{PostEvent, ProfileEvent};
    use crate::state::RequestStatus;

    #[test]
    fn dispatch_applies_events_in_order() {
        let store = Store::default();

        store.dispatch(PostEvent::LoadingStarted);
        assert!(store.snapshot().posts.status.is_loading());

        store.dispatch(PostEvent::ListReceived(None));
        assert_eq!(store.snapshot().posts.status, RequestStatus::Loaded);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = Store::default();
        let mut rx = store.subscribe();

        let clone = store.clone();
        clone.dispatch(ProfileEvent::LoadingStarted);

        rx.changed().await.unwrap();
        assert!(rx.borrow().profile.status.is_loading());
    }
}
