//! App driven against a real store, the way the main loop pumps it

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use smart_wallet::app::{App, Focus, StatusLevel};
use smart_wallet::core::{Action, ExportFormat, NotifyLevel, Page, SearchPhase};
use smart_wallet::infrastructure::{ApiConfig, HttpWalletApi};
use smart_wallet::modules::export::export_analysis_to;
use smart_wallet::store::{StoreEvent, WalletStore};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WALLET: &str = "0x1234567890123456789012345678901234567890";
const SIMILAR: &str = "0x9999999999999999999999999999999999999999";

struct Harness {
    app: App,
    store: WalletStore,
    events: UnboundedReceiver<StoreEvent>,
}

impl Harness {
    fn new(server: &MockServer) -> Self {
        let api = HttpWalletApi::new(ApiConfig {
            backend_url: format!("{}/api/v1", server.uri()),
            ml_service_url: None,
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        let (store, events) = WalletStore::new(Arc::new(api), Handle::current());
        Self {
            app: App::new(),
            store,
            events,
        }
    }

    /// One main-loop iteration without rendering
    fn pump(&mut self) {
        if let Some(address) = self.app.take_address_edit() {
            self.store.set_wallet_address(address);
        }
        if let Some(address) = self.app.take_search_request() {
            self.store.search_wallet(address);
        }
        while let Ok(event) = self.events.try_recv() {
            self.app.apply_store_event(event);
        }
        self.app.sync_state(self.store.snapshot());
    }

    async fn pump_until_settled(&mut self) {
        for _ in 0..200 {
            self.pump();
            if !self.app.state.is_loading() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("search did not settle");
    }
}

async fn mount_analysis(server: &MockServer, address: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/v1/analyze"))
        .and(body_json(json!({ "address": address })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn wallet_body() -> serde_json::Value {
    json!({
        "status": "ok",
        "transactions": [{
            "hash": "0xfeedface00000000000000000000000000000000000000000000000000000001",
            "from_address": WALLET,
            "to_address": "0x0000000000000000000000000000000000000002",
            "value": "1000000000000000000",
            "gas_price": "30000000000",
            "receipt_status": "1",
            "block_timestamp": "2024-01-01T00:00:00Z",
            "transaction_fee": "0.00063"
        }],
        "ml_result": {
            "confidence": 0.85,
            "predicted_class": "Exchange",
            "similar_wallets": [SIMILAR]
        }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn typed_address_is_analysed_and_results_open() {
    let server = MockServer::start().await;
    mount_analysis(&server, WALLET, wallet_body()).await;
    let mut h = Harness::new(&server);

    for ch in WALLET.chars() {
        h.app.push_input_char(ch);
    }
    h.pump();
    assert_eq!(h.store.snapshot().current_address(), WALLET);

    h.app.submit_input();
    h.pump();
    assert!(h.app.state.is_loading());
    assert_eq!(h.app.page, Page::InsertWallet);

    // Enter while loading is ignored
    h.app.submit_input();
    assert_eq!(h.app.take_search_request(), None);

    h.pump_until_settled().await;
    h.pump();
    assert_eq!(h.app.state.phase(), SearchPhase::Success);
    assert_eq!(h.app.page, Page::Results);
    assert_eq!(h.app.focus, Focus::Transactions);
    assert_eq!(h.app.state.search_history(), [WALLET]);
}

#[tokio::test(flavor = "multi_thread")]
async fn similar_wallet_starts_a_new_analysis() {
    let server = MockServer::start().await;
    mount_analysis(&server, WALLET, wallet_body()).await;
    mount_analysis(
        &server,
        SIMILAR,
        json!({"status": "ok", "ml_result": {"confidence": 0.4, "predicted_class": "Individual"}}),
    )
    .await;
    let mut h = Harness::new(&server);

    h.app.request_search(WALLET);
    h.pump_until_settled().await;
    h.pump();

    h.app.cycle_focus(true);
    assert_eq!(h.app.focus, Focus::SimilarWallets);
    h.app.activate();
    assert_eq!(h.app.page, Page::InsertWallet);
    h.pump();
    assert_eq!(h.app.address_input, SIMILAR);

    h.pump_until_settled().await;
    h.pump();
    assert_eq!(h.app.page, Page::Results);
    assert_eq!(h.app.state.analyzed_address(), Some(SIMILAR));
    assert_eq!(h.app.state.search_history(), [WALLET, SIMILAR]);

    let picks: Vec<String> = h.app.quick_picks().into_iter().map(|p| p.address).collect();
    assert_eq!(picks, [SIMILAR, WALLET]);
}

#[tokio::test(flavor = "multi_thread")]
async fn backend_error_stays_on_insert_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_string("invalid address"))
        .mount(&server)
        .await;
    let mut h = Harness::new(&server);

    h.app.command.input = "search 0xnope".to_string();
    h.app.apply_command();
    h.pump_until_settled().await;
    h.pump();

    assert_eq!(h.app.page, Page::InsertWallet);
    assert_eq!(h.app.state.last_error(), Some("invalid address"));
    assert_eq!(h.app.address_input, "0xnope");

    // No analysis to come back to
    h.app.apply_action(Action::Navigate(smart_wallet::core::NavigateTarget::Results));
    assert_eq!(h.app.page, Page::InsertWallet);
    assert_eq!(h.app.status_text().map(|s| s.1), Some(StatusLevel::Warn));
}

#[tokio::test(flavor = "multi_thread")]
async fn export_after_analysis_writes_both_formats() {
    let server = MockServer::start().await;
    mount_analysis(&server, WALLET, wallet_body()).await;
    let mut h = Harness::new(&server);

    h.app.request_search(WALLET);
    h.pump_until_settled().await;
    h.pump();

    let dir = tempfile::tempdir().unwrap();
    for format in [ExportFormat::Csv, ExportFormat::Json] {
        h.app.apply_action(Action::Export(format));
        let requested = h.app.take_export_request().unwrap();
        let action = export_analysis_to(dir.path(), &h.app.state, requested);
        assert!(
            matches!(action, Action::Notify(_, NotifyLevel::Info)),
            "{action:?}"
        );
    }

    let csv_path = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .unwrap();
    let csv = std::fs::read_to_string(csv_path).unwrap();
    assert_eq!(csv.lines().count(), 2);
}
