//! Wallet store - drives [`AppState`] from the network
//!
//! The TUI thread calls the store synchronously; network work runs as tasks
//! on the Tokio runtime the store was given. Every resolution is applied to
//! the shared state under one lock, so a render never sees half a transition.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::core::state::{AppState, Page, RequestId, Resolution};
use crate::infrastructure::WalletApi;

/// Notifications for the UI loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// State changed; redraw from a fresh snapshot
    Changed,
    /// A search succeeded and the UI should switch screens
    Navigate(Page),
}

/// A search that has been started but not necessarily resolved
#[derive(Debug)]
pub struct SearchTicket {
    pub id: RequestId,
    /// Completes once the response has been applied (or discarded as stale)
    pub task: JoinHandle<Resolution>,
}

#[derive(Clone)]
pub struct WalletStore {
    state: Arc<Mutex<AppState>>,
    api: Arc<dyn WalletApi>,
    runtime: Handle,
    events: UnboundedSender<StoreEvent>,
}

impl WalletStore {
    pub fn new(api: Arc<dyn WalletApi>, runtime: Handle) -> (Self, UnboundedReceiver<StoreEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let store = Self {
            state: Arc::new(Mutex::new(AppState::new())),
            api,
            runtime,
            events,
        };
        (store, rx)
    }

    /// One-shot liveness sample at startup. No retry, no re-check.
    pub fn init(&self) -> JoinHandle<()> {
        let store = self.clone();
        self.runtime.spawn(async move {
            let (backend, ml) =
                futures::join!(store.api.check_liveness(), store.api.check_ml_liveness());
            tracing::info!(backend_alive = backend, ml_service_alive = ?ml, "liveness checked");
            store.lock().set_liveness(backend, ml);
            store.emit(StoreEvent::Changed);
        })
    }

    pub fn set_wallet_address(&self, address: impl Into<String>) {
        self.lock().set_wallet_address(address);
        self.emit(StoreEvent::Changed);
    }

    /// Start analysing `address`. Returns immediately with the state already
    /// in `Loading`; the outcome arrives through the state and [`StoreEvent`]s.
    pub fn search_wallet(&self, address: impl Into<String>) -> SearchTicket {
        let address = address.into();
        let id = self.lock().begin_search(address.clone());
        tracing::info!(request = id, %address, "wallet search started");
        self.emit(StoreEvent::Changed);

        let store = self.clone();
        let task = self.runtime.spawn(async move {
            let outcome = store.api.fetch_analysis(&address).await;
            if let Err(err) = &outcome {
                tracing::warn!(request = id, %address, error = %err, "wallet search failed");
            }

            // Events are queued before the lock is released, so a snapshot
            // showing the settled search always has its events behind it.
            let mut state = store.lock();
            let resolution = state.resolve_search(id, outcome);
            match resolution {
                Resolution::Stale => {
                    tracing::debug!(request = id, "discarding stale search response");
                }
                Resolution::Applied { navigate } => {
                    tracing::info!(request = id, ok = navigate.is_some(), "wallet search settled");
                    store.emit(StoreEvent::Changed);
                    if let Some(page) = navigate {
                        store.emit(StoreEvent::Navigate(page));
                    }
                }
            }
            drop(state);
            resolution
        });

        SearchTicket { id, task }
    }

    /// Copy of the state for one render cycle
    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        // Transitions never panic midway, so a poisoned lock still holds
        // consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: StoreEvent) {
        let _ = self.events.send(event);
    }
}
