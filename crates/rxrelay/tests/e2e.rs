// SPDX-FileCopyrightText: 2026 RxRelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests over the real adapters: webhook in, WhatsApp gateway
//! (wiremock) out, CSV ledger on disk.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rxrelay_config::RxRelayConfig;
use rxrelay_config::model::LedgerBackend;
use rxrelay_conversation::{ConversationEngine, ConversationStore, QueueCounter, SystemClock};
use rxrelay_core::{ChatSender, Ledger};
use rxrelay_gateway::{AuthConfig, GatewayState, HealthState, ServerConfig, build_router};
use rxrelay_ledger::CsvLedger;
use rxrelay_whatsapp::WhatsAppSender;
use tokio_util::task::TaskTracker;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCTOR: &str = "6281100000001";
const PHARMACY: &str = "6281200000000";
const PATIENT: &str = "6281234567890";

const FORM: &str = "Doctor Name: Budi Santoso\n\
                    Patient Name: Sari Wulandari\n\
                    Patient Birth Date: 12-05-1988\n\
                    Registry Number: RM-00123\n\
                    Medication: Amoxicillin, Paracetamol\n\
                    Patient Phone Number: 081234567890\n\
                    Payment Method: BPJS";

struct Relay {
    router: axum::Router,
    tasks: TaskTracker,
    ledger: Arc<CsvLedger>,
    gateway: MockServer,
    _dir: tempfile::TempDir,
}

impl Relay {
    async fn start(gateway_status: u16) -> Self {
        let gateway = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send/message"))
            .respond_with(ResponseTemplate::new(gateway_status))
            .mount(&gateway)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = RxRelayConfig::default();
        config.bot.allowed_senders = vec![DOCTOR.to_string()];
        config.whatsapp.api_url = gateway.uri();
        config.whatsapp.pharmacy_number = PHARMACY.to_string();
        config.ledger.backend = LedgerBackend::Csv;
        config.ledger.csv_path = dir.path().join("prescriptions.csv").display().to_string();

        let sender: Arc<dyn ChatSender> = Arc::new(WhatsAppSender::new(&config.whatsapp).unwrap());
        let ledger = Arc::new(CsvLedger::new(&config.ledger.csv_path));
        let engine = Arc::new(ConversationEngine::new(
            &config,
            sender.clone(),
            ledger.clone() as Arc<dyn Ledger>,
            Arc::new(ConversationStore::new()),
            Arc::new(QueueCounter::new(Arc::new(SystemClock))),
        ));

        let tasks = TaskTracker::new();
        tasks.close();
        let state = GatewayState {
            engine,
            sender,
            auth: AuthConfig::default(),
            health: HealthState::new(None),
            tasks: tasks.clone(),
        };
        let server_config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            webhook_path: config.gateway.webhook_path.clone(),
        };

        Self {
            router: build_router(&server_config, state),
            tasks,
            ledger,
            gateway,
            _dir: dir,
        }
    }

    /// Delivers one webhook and waits for the conversation task to finish.
    async fn deliver(&self, text: &str) {
        let body = serde_json::json!({
            "chat_id": format!("{DOCTOR}@s.whatsapp.net"),
            "message": {"text": text, "id": "3EB0"},
            "sender_id": DOCTOR,
        });
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        self.tasks.wait().await;
    }

    /// `(phone, message)` pairs the WhatsApp gateway received, in order.
    async fn outbound(&self) -> Vec<(String, String)> {
        self.gateway
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                (
                    body["phone"].as_str().unwrap().to_string(),
                    body["message"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }
}

#[tokio::test]
async fn prescription_flows_from_webhook_to_pharmacy_and_ledger() {
    let relay = Relay::start(200).await;

    relay.deliver("/start").await;
    relay.deliver("1").await;
    relay.deliver(FORM).await;
    relay.deliver("Y").await;

    let outbound = relay.outbound().await;
    let pharmacy: Vec<&String> = outbound
        .iter()
        .filter(|(phone, _)| phone == PHARMACY)
        .map(|(_, text)| text)
        .collect();
    assert_eq!(pharmacy.len(), 1);
    assert!(pharmacy[0].contains("With Queue Number: 1"));
    assert!(pharmacy[0].contains("1. Amoxicillin,\n2. Paracetamol"));
    assert!(pharmacy[0].contains("Doctor Budi Santoso"));

    let patient: Vec<&String> = outbound
        .iter()
        .filter(|(phone, _)| phone == PATIENT)
        .map(|(_, text)| text)
        .collect();
    assert_eq!(patient.len(), 1);
    assert!(patient[0].contains("Your queue number is 1"));

    let rows = relay.ledger.read_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].queue, 1);
    assert_eq!(rows[0].patient_name, "Sari Wulandari");
    assert_eq!(rows[0].medication, "Amoxicillin, Paracetamol");
    assert_eq!(rows[0].patient_phone, PATIENT);
}

#[tokio::test]
async fn second_prescription_gets_next_queue_number() {
    let relay = Relay::start(200).await;

    for _ in 0..2 {
        relay.deliver("/start").await;
        relay.deliver("1").await;
        relay.deliver(FORM).await;
        relay.deliver("y").await;
    }

    let queues: Vec<u32> = relay
        .ledger
        .read_all()
        .await
        .unwrap()
        .iter()
        .map(|r| r.queue)
        .collect();
    assert_eq!(queues, vec![1, 2]);
}

#[tokio::test]
async fn unreachable_pharmacy_still_records_ledger_row() {
    let relay = Relay::start(500).await;

    relay.deliver("/start").await;
    relay.deliver("1").await;
    relay.deliver(FORM).await;
    relay.deliver("Y").await;

    // Ledger append precedes the pharmacy send.
    assert_eq!(relay.ledger.read_all().await.unwrap().len(), 1);
    let outbound = relay.outbound().await;
    assert!(outbound.iter().any(|(phone, _)| phone == PHARMACY));
    assert!(!outbound.iter().any(|(phone, _)| phone == PATIENT));
}
