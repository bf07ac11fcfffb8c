//! Store workflow: liveness, searches, and out-of-order responses

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use smart_wallet::core::{Page, Resolution, SearchPhase};
use smart_wallet::domain::{parse_analysis, WalletAnalysis};
use smart_wallet::infrastructure::{ApiConfig, ApiError, HttpWalletApi, WalletApi};
use smart_wallet::store::{StoreEvent, WalletStore};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type Outcome = Result<WalletAnalysis, ApiError>;

/// Responses are held back until the test releases them
#[derive(Default)]
struct GatedApi {
    gates: Mutex<HashMap<String, oneshot::Receiver<Outcome>>>,
}

impl GatedApi {
    fn gate(&self, address: &str) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(address.to_string(), rx);
        tx
    }
}

#[async_trait]
impl WalletApi for GatedApi {
    async fn check_liveness(&self) -> bool {
        true
    }

    async fn fetch_analysis(&self, address: &str) -> Outcome {
        let gate = self.gates.lock().unwrap().remove(address);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("gate dropped".to_string()))),
            None => Err(ApiError::Network(format!("no gate for {address}"))),
        }
    }
}

fn analysis(class: &str) -> WalletAnalysis {
    parse_analysis(&format!(
        r#"{{"status":"ok","ml_result":{{"confidence":0.5,"predicted_class":"{class}"}}}}"#
    ))
    .unwrap()
}

fn http_store(server: &MockServer) -> (WalletStore, UnboundedReceiver<StoreEvent>) {
    let api = HttpWalletApi::new(ApiConfig {
        backend_url: format!("{}/api/v1", server.uri()),
        ml_service_url: Some(format!("{}/ml", server.uri())),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    WalletStore::new(Arc::new(api), Handle::current())
}

fn drain(events: &mut UnboundedReceiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

fn navigations(events: &[StoreEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, StoreEvent::Navigate(_)))
        .count()
}

#[tokio::test(flavor = "multi_thread")]
async fn init_records_liveness() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/alive"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ml/health"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let (store, mut events) = http_store(&server);
    assert!(!store.snapshot().liveness_checked());

    store.init().await.unwrap();

    let state = store.snapshot();
    assert!(state.liveness_checked());
    assert!(state.backend_alive());
    assert_eq!(state.ml_service_alive(), Some(false));
    assert_eq!(drain(&mut events), [StoreEvent::Changed]);
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_search_navigates_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "transactions": [],
            "ml_result": {"confidence": 0.85, "predicted_class": "Exchange", "similar_wallets": []}
        })))
        .mount(&server)
        .await;

    let (store, mut events) = http_store(&server);
    let ticket = store.search_wallet("0xabc");
    assert!(store.snapshot().is_loading());

    let resolution = ticket.task.await.unwrap();
    assert_eq!(
        resolution,
        Resolution::Applied {
            navigate: Some(Page::Results)
        }
    );

    let state = store.snapshot();
    assert!(!state.is_loading());
    assert_eq!(state.phase(), SearchPhase::Success);
    assert_eq!(state.last_error(), None);
    assert_eq!(state.search_history(), ["0xabc"]);
    assert_eq!(
        state.last_result().and_then(|a| a.predicted_class()),
        Some("Exchange")
    );

    let seen = drain(&mut events);
    assert_eq!(navigations(&seen), 1);
    assert_eq!(seen.last(), Some(&StoreEvent::Navigate(Page::Results)));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_search_keeps_page_and_shows_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_string("invalid address"))
        .mount(&server)
        .await;

    let (store, mut events) = http_store(&server);
    let resolution = store.search_wallet("0xbad").task.await.unwrap();
    assert_eq!(resolution, Resolution::Applied { navigate: None });

    let state = store.snapshot();
    assert!(!state.is_loading());
    assert_eq!(state.phase(), SearchPhase::Failed);
    assert_eq!(state.last_error(), Some("invalid address"));
    assert!(state.last_result().is_none());
    assert!(state.search_history().is_empty());
    assert_eq!(navigations(&drain(&mut events)), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_backend_is_a_network_error() {
    let api = HttpWalletApi::new(ApiConfig {
        backend_url: "http://127.0.0.1:1/api/v1".to_string(),
        ml_service_url: None,
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let (store, _events) = WalletStore::new(Arc::new(api), Handle::current());

    store.search_wallet("0xabc").task.await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.phase(), SearchPhase::Failed);
    assert!(state
        .last_error()
        .is_some_and(|msg| msg.starts_with("Network error")));
}

#[tokio::test(flavor = "multi_thread")]
async fn loading_is_set_before_the_response() {
    let api = Arc::new(GatedApi::default());
    let release = api.gate("0x01");
    let (store, _events) = WalletStore::new(api.clone(), Handle::current());

    store.set_wallet_address("0x01");
    let ticket = store.search_wallet("0x01");
    let state = store.snapshot();
    assert!(state.is_loading());
    assert_eq!(state.current_address(), "0x01");
    assert_eq!(state.latest_request(), ticket.id);

    release.send(Ok(analysis("Exchange"))).unwrap();
    ticket.task.await.unwrap();
    assert!(!store.snapshot().is_loading());
}

#[tokio::test(flavor = "multi_thread")]
async fn late_response_for_older_search_is_discarded() {
    let api = Arc::new(GatedApi::default());
    let release_first = api.gate("0x01");
    let release_second = api.gate("0x02");
    let (store, mut events) = WalletStore::new(api.clone(), Handle::current());

    let first = store.search_wallet("0x01");
    let second = store.search_wallet("0x02");
    assert!(second.id > first.id);

    // The older request answers first and must not settle the search
    release_first.send(Ok(analysis("Exchange"))).unwrap();
    assert_eq!(first.task.await.unwrap(), Resolution::Stale);
    let state = store.snapshot();
    assert!(state.is_loading());
    assert!(state.last_result().is_none());

    release_second
        .send(Err(ApiError::Backend {
            status: 400,
            body: "invalid address".to_string(),
        }))
        .unwrap();
    assert_eq!(
        second.task.await.unwrap(),
        Resolution::Applied { navigate: None }
    );

    let state = store.snapshot();
    assert_eq!(state.current_address(), "0x02");
    assert_eq!(state.last_error(), Some("invalid address"));
    assert!(state.search_history().is_empty());
    assert_eq!(navigations(&drain(&mut events)), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn failure_after_success_keeps_previous_result() {
    let api = Arc::new(GatedApi::default());
    let (store, mut events) = WalletStore::new(api.clone(), Handle::current());

    let release = api.gate("0xgood");
    let ticket = store.search_wallet("0xgood");
    release.send(Ok(analysis("Individual"))).unwrap();
    ticket.task.await.unwrap();

    let release = api.gate("0xbad");
    let ticket = store.search_wallet("0xbad");
    release
        .send(Err(ApiError::Network("connection refused".to_string())))
        .unwrap();
    ticket.task.await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.phase(), SearchPhase::Failed);
    assert_eq!(state.last_error(), Some("Network error: connection refused"));
    assert_eq!(state.analyzed_address(), Some("0xgood"));
    assert_eq!(
        state.last_result().and_then(|a| a.predicted_class()),
        Some("Individual")
    );
    assert_eq!(state.search_history(), ["0xgood"]);
    assert_eq!(navigations(&drain(&mut events)), 1);
}
