//! Wallet search workflow state
//!
//! `AppState` is the single source of truth for the search workflow. It only
//! changes through the transitions below, each of which keeps the invariants
//! in one place:
//!
//! - `loading` is true only while the latest search is unresolved
//! - a successful search stores the result, clears the error, appends history
//! - a failed search stores the error and keeps the previous result
//! - a resolution for anything but the latest request is discarded

use crate::domain::WalletAnalysis;
use crate::infrastructure::{ApiError, ErrorKind};

/// Monotonic id handed out by [`AppState::begin_search`]
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    InsertWallet,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The resolution changed state; `navigate` is set on success
    Applied { navigate: Option<Page> },
    /// A newer search was started meanwhile; state untouched
    Stale,
}

#[derive(Debug, Clone)]
pub struct AppState {
    current_address: String,
    backend_alive: bool,
    ml_service_alive: Option<bool>,
    liveness_checked: bool,
    phase: SearchPhase,
    last_result: Option<WalletAnalysis>,
    analyzed_address: Option<String>,
    search_history: Vec<String>,
    last_error: Option<String>,
    last_error_kind: Option<ErrorKind>,
    latest_request: RequestId,
    pending_address: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_address: String::new(),
            backend_alive: false,
            ml_service_alive: None,
            liveness_checked: false,
            phase: SearchPhase::Idle,
            last_result: None,
            analyzed_address: None,
            search_history: Vec::new(),
            last_error: None,
            last_error_kind: None,
            latest_request: 0,
            pending_address: None,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_wallet_address(&mut self, address: impl Into<String>) {
        self.current_address = address.into();
    }

    pub fn set_liveness(&mut self, backend_alive: bool, ml_service_alive: Option<bool>) {
        self.backend_alive = backend_alive;
        self.ml_service_alive = ml_service_alive;
        self.liveness_checked = true;
    }

    /// Enter `Loading` for `address` and return the id of the new request.
    ///
    /// Allowed from every phase; an unresolved earlier request becomes stale.
    pub fn begin_search(&mut self, address: impl Into<String>) -> RequestId {
        let address = address.into();
        self.current_address = address.clone();
        self.pending_address = Some(address);
        self.phase = SearchPhase::Loading;
        self.last_error = None;
        self.last_error_kind = None;
        self.latest_request += 1;
        self.latest_request
    }

    pub fn resolve_search(
        &mut self,
        id: RequestId,
        outcome: Result<WalletAnalysis, ApiError>,
    ) -> Resolution {
        if id != self.latest_request || self.phase != SearchPhase::Loading {
            return Resolution::Stale;
        }
        let address = self.pending_address.take().unwrap_or_default();

        match outcome {
            Ok(analysis) => {
                self.last_result = Some(analysis);
                self.analyzed_address = Some(address.clone());
                self.search_history.push(address);
                self.last_error = None;
                self.last_error_kind = None;
                self.phase = SearchPhase::Success;
                Resolution::Applied {
                    navigate: Some(Page::Results),
                }
            }
            Err(err) => {
                self.last_error = Some(err.message());
                self.last_error_kind = Some(err.kind());
                self.phase = SearchPhase::Failed;
                Resolution::Applied { navigate: None }
            }
        }
    }

    pub fn current_address(&self) -> &str {
        &self.current_address
    }

    pub fn backend_alive(&self) -> bool {
        self.backend_alive
    }

    pub fn ml_service_alive(&self) -> Option<bool> {
        self.ml_service_alive
    }

    /// False until the startup probe has answered
    pub fn liveness_checked(&self) -> bool {
        self.liveness_checked
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn last_result(&self) -> Option<&WalletAnalysis> {
        self.last_result.as_ref()
    }

    /// Address the current `last_result` belongs to
    pub fn analyzed_address(&self) -> Option<&str> {
        self.analyzed_address.as_deref()
    }

    pub fn search_history(&self) -> &[String] {
        &self.search_history
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_error_kind(&self) -> Option<ErrorKind> {
        self.last_error_kind
    }

    pub fn latest_request(&self) -> RequestId {
        self.latest_request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(class: &str) -> WalletAnalysis {
        crate::domain::parse_analysis(&format!(
            r#"{{"status":"ok","ml_result":{{"confidence":0.5,"predicted_class":"{class}"}}}}"#
        ))
        .unwrap()
    }

    fn backend_error(body: &str) -> ApiError {
        ApiError::Backend {
            status: 500,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_set_wallet_address_is_verbatim() {
        let mut state = AppState::new();
        for address in ["0xcB1C1FdE09f811B294172696404e88E658659905", "  0xABC ", ""] {
            state.set_wallet_address(address);
            assert_eq!(state.current_address(), address);
        }
        assert_eq!(state.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_success_transition() {
        let mut state = AppState::new();
        let id = state.begin_search("0xaaa");
        assert!(state.is_loading());
        assert_eq!(state.phase(), SearchPhase::Loading);

        let resolution = state.resolve_search(id, Ok(analysis("Exchange")));
        assert_eq!(
            resolution,
            Resolution::Applied {
                navigate: Some(Page::Results)
            }
        );
        assert!(!state.is_loading());
        assert_eq!(state.phase(), SearchPhase::Success);
        assert_eq!(state.last_result(), Some(&analysis("Exchange")));
        assert_eq!(state.last_error(), None);
        assert_eq!(state.analyzed_address(), Some("0xaaa"));
        assert_eq!(state.search_history(), ["0xaaa"]);
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let mut state = AppState::new();
        let id = state.begin_search("0xaaa");
        state.resolve_search(id, Ok(analysis("Exchange")));

        let id = state.begin_search("0xbad");
        assert_eq!(state.last_error(), None);
        let resolution = state.resolve_search(id, Err(backend_error("invalid address")));

        assert_eq!(resolution, Resolution::Applied { navigate: None });
        assert_eq!(state.phase(), SearchPhase::Failed);
        assert_eq!(state.last_error(), Some("invalid address"));
        assert_eq!(state.last_error_kind(), Some(ErrorKind::Backend));
        assert_eq!(state.last_result(), Some(&analysis("Exchange")));
        assert_eq!(state.analyzed_address(), Some("0xaaa"));
        assert_eq!(state.search_history(), ["0xaaa"]);
    }

    #[test]
    fn test_new_search_clears_error() {
        let mut state = AppState::new();
        let id = state.begin_search("0xbad");
        state.resolve_search(id, Err(ApiError::Network("refused".into())));
        assert!(state.last_error().is_some());

        state.begin_search("0xgood");
        assert_eq!(state.last_error(), None);
        assert_eq!(state.last_error_kind(), None);
        assert!(state.is_loading());
    }

    #[test]
    fn test_stale_resolution_is_discarded() {
        let mut state = AppState::new();
        let first = state.begin_search("0x01");
        let second = state.begin_search("0x02");
        assert!(second > first);

        assert_eq!(
            state.resolve_search(first, Ok(analysis("Exchange"))),
            Resolution::Stale
        );
        assert!(state.is_loading());
        assert!(state.last_result().is_none());
        assert!(state.search_history().is_empty());

        state.resolve_search(second, Ok(analysis("Individual")));
        assert!(!state.is_loading());
        assert_eq!(state.search_history(), ["0x02"]);
    }

    #[test]
    fn test_resolving_twice_is_stale() {
        let mut state = AppState::new();
        let id = state.begin_search("0x01");
        state.resolve_search(id, Ok(analysis("Exchange")));
        assert_eq!(
            state.resolve_search(id, Err(backend_error("late"))),
            Resolution::Stale
        );
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_history_is_append_only_without_dedup() {
        let mut state = AppState::new();
        for address in ["0x01", "0x02", "0x01"] {
            let id = state.begin_search(address);
            state.resolve_search(id, Ok(analysis("Exchange")));
        }
        assert_eq!(state.search_history(), ["0x01", "0x02", "0x01"]);
    }

    #[test]
    fn test_liveness() {
        let mut state = AppState::new();
        assert!(!state.liveness_checked());
        state.set_liveness(true, Some(false));
        assert!(state.backend_alive());
        assert_eq!(state.ml_service_alive(), Some(false));
        assert!(state.liveness_checked());
    }
}
