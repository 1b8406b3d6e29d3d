//! End-to-end pipeline tests against wiremock fixture servers.
//!
//! Run with:
//!   cargo test --test integration

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relay_mkt_client::{ClientConfig, ErrorKind, RetryConfig, StaticTokenProvider};
use relay_mkt_fulfillment::{
    ActivatedSubscription, CallOptions, CancellationToken, CorrelationId, FulfillmentClient,
    LedgerError, OperationLedger, OperationStatus, OperationUpdate, RequestId,
    SubscriptionActionResult, DEFAULT_API_VERSION, MOCK_API_VERSION,
};

const SUB_ID: &str = "37f9dea2-4345-438f-b0bd-03d40d28c7e0";
const OP_ID: &str = "74dfb4db-c193-4891-827d-eb05fbdc64b0";

fn client(server: &MockServer) -> FulfillmentClient {
    FulfillmentClient::with_config(
        &server.uri(),
        Arc::new(StaticTokenProvider::new("test-token")),
        ClientConfig::builder().without_retry().build(),
    )
    .unwrap()
}

fn subscription_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "planId": "gold",
        "quantity": 10,
        "saasSubscriptionStatus": "Subscribed"
    })
}

#[tokio::test]
async fn missing_ids_are_generated_fresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{SUB_ID}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(subscription_json(SUB_ID, "Contoso")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let subscription = client(&server)
        .get_subscription(Uuid::parse_str(SUB_ID).unwrap(), &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(subscription.id.to_string(), SUB_ID);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    // Both tracing headers carry freshly generated, parseable UUIDs
    for name in ["x-ms-requestid", "x-ms-correlationid"] {
        let value = requests[0]
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(
            Uuid::parse_str(value).is_ok_and(|id| !id.is_nil()),
            "{name} should be a generated UUID, got {value:?}"
        );
    }
}

#[tokio::test]
async fn supplied_ids_are_used_verbatim() {
    let server = MockServer::start().await;
    let request_id = RequestId::new();
    let correlation_id = CorrelationId::new();

    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{SUB_ID}")))
        .and(header("x-ms-requestid", request_id.to_string().as_str()))
        .and(header(
            "x-ms-correlationid",
            correlation_id.to_string().as_str(),
        ))
        .and(header("Authorization", "Bearer test-token"))
        .and(query_param("api-version", DEFAULT_API_VERSION))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(subscription_json(SUB_ID, "Contoso")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let opts = CallOptions::new()
        .with_request_id(request_id)
        .with_correlation_id(correlation_id);

    client(&server)
        .get_subscription(Uuid::parse_str(SUB_ID).unwrap(), &opts)
        .await
        .unwrap();
}

#[tokio::test]
async fn list_subscriptions_follows_next_link_in_order() {
    let server = MockServer::start().await;
    let second_sub = "b7a7a757-0a4f-4fa7-9b4e-3fb1b0a5af51";

    let page_two_url = format!(
        "{}/subscriptions?page=2&api-version={DEFAULT_API_VERSION}",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [subscription_json(second_sub, "Second")],
            "nextLink": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [subscription_json(SUB_ID, "First")],
            "nextLink": page_two_url
        })))
        .expect(1)
        .mount(&server)
        .await;

    let correlation_id = CorrelationId::new();
    let opts = CallOptions::new().with_correlation_id(correlation_id);

    let subscriptions = client(&server).list_subscriptions(&opts).await.unwrap();

    // Exactly two subscriptions, in page order
    assert_eq!(subscriptions.len(), 2);
    assert_eq!(subscriptions[0].id.to_string(), SUB_ID);
    assert_eq!(subscriptions[1].id.to_string(), second_sub);

    // Fresh RequestId per page, fixed CorrelationId
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let header_of = |i: usize, name: &str| {
        requests[i]
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    assert_eq!(
        header_of(0, "x-ms-correlationid"),
        correlation_id.to_string()
    );
    assert_eq!(
        header_of(1, "x-ms-correlationid"),
        correlation_id.to_string()
    );
    assert_ne!(header_of(0, "x-ms-requestid"), header_of(1, "x-ms-requestid"));
}

#[tokio::test]
async fn null_next_link_terminates_after_one_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [subscription_json(SUB_ID, "Only")],
            "nextLink": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let subscriptions = client(&server)
        .list_subscriptions(&CallOptions::new())
        .await
        .unwrap();

    assert_eq!(subscriptions.len(), 1);
}

#[tokio::test]
async fn service_unavailable_is_retried_to_the_ceiling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{SUB_ID}")))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = FulfillmentClient::with_config(
        &server.uri(),
        Arc::new(StaticTokenProvider::new("test-token")),
        ClientConfig::builder()
            .with_retry(
                RetryConfig::default()
                    .with_max_attempts(2)
                    .with_initial_delay(Duration::from_millis(5)),
            )
            .build(),
    )
    .unwrap();

    let err = client
        .get_subscription(Uuid::parse_str(SUB_ID).unwrap(), &CallOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::RetriesExhausted { attempts: 2 }
    ));
}

#[tokio::test]
async fn not_found_is_never_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{SUB_ID}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": "EntityNotFound", "message": "subscription does not exist"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = FulfillmentClient::with_config(
        &server.uri(),
        Arc::new(StaticTokenProvider::new("test-token")),
        ClientConfig::builder()
            .with_retry(
                RetryConfig::default()
                    .with_max_attempts(3)
                    .with_initial_delay(Duration::from_millis(5)),
            )
            .build(),
    )
    .unwrap();

    let err = client
        .get_subscription(Uuid::parse_str(SUB_ID).unwrap(), &CallOptions::new())
        .await
        .unwrap_err();

    match err.kind {
        ErrorKind::Api { status, code, .. } => {
            assert_eq!(status, 404);
            assert_eq!(code, "EntityNotFound");
        }
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[derive(Default)]
struct RecordingLedger {
    records: Mutex<Vec<(Uuid, SubscriptionActionResult)>>,
}

#[async_trait]
impl OperationLedger for RecordingLedger {
    async fn record(
        &self,
        subscription_id: Uuid,
        outcome: &SubscriptionActionResult,
    ) -> Result<(), LedgerError> {
        self.records
            .lock()
            .await
            .push((subscription_id, outcome.clone()));
        Ok(())
    }
}

struct FailingLedger;

#[async_trait]
impl OperationLedger for FailingLedger {
    async fn record(&self, _: Uuid, _: &SubscriptionActionResult) -> Result<(), LedgerError> {
        Err(LedgerError("ledger store offline".into()))
    }
}

#[tokio::test]
async fn delete_records_outcome_to_ledger_once() {
    let server = MockServer::start().await;
    let operation_location = format!(
        "{}/subscriptions/{SUB_ID}/operations/{OP_ID}?api-version={DEFAULT_API_VERSION}",
        server.uri()
    );

    Mock::given(method("DELETE"))
        .and(path(format!("/subscriptions/{SUB_ID}")))
        .respond_with(
            ResponseTemplate::new(202).insert_header("Operation-Location", operation_location.as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ledger = Arc::new(RecordingLedger::default());
    let client = client(&server).with_ledger(ledger.clone());

    let result = client
        .delete_subscription(Uuid::parse_str(SUB_ID).unwrap(), &CallOptions::new())
        .await
        .unwrap();

    assert_eq!(result.status, 202);
    assert_eq!(result.operation_id(), Some(Uuid::parse_str(OP_ID).unwrap()));

    let records = ledger.records.lock().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].0.to_string(), SUB_ID);
    assert_eq!(records[0].1, result);
}

#[tokio::test]
async fn plan_update_records_outcome_and_sends_minimal_body() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("/subscriptions/{SUB_ID}")))
        .and(body_json(serde_json::json!({"planId": "silver"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let ledger = Arc::new(RecordingLedger::default());
    let client = client(&server).with_ledger(ledger.clone());

    client
        .update_subscription_plan(Uuid::parse_str(SUB_ID).unwrap(), "silver", &CallOptions::new())
        .await
        .unwrap();

    assert_eq!(ledger.records.lock().await.len(), 1);
}

#[tokio::test]
async fn ledger_failure_does_not_affect_the_caller() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/subscriptions/{SUB_ID}")))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).with_ledger(Arc::new(FailingLedger));

    let result = client
        .delete_subscription(Uuid::parse_str(SUB_ID).unwrap(), &CallOptions::new())
        .await
        .unwrap();

    assert_eq!(result.status, 202);
}

#[tokio::test]
async fn quantity_update_does_not_touch_the_ledger() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("/subscriptions/{SUB_ID}")))
        .and(body_json(serde_json::json!({"quantity": 25})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let ledger = Arc::new(RecordingLedger::default());
    let client = client(&server).with_ledger(ledger.clone());

    client
        .update_subscription_quantity(Uuid::parse_str(SUB_ID).unwrap(), 25, &CallOptions::new())
        .await
        .unwrap();

    assert!(ledger.records.lock().await.is_empty());
}

#[tokio::test]
async fn resolve_sends_token_in_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/subscriptions/resolve"))
        .and(header("x-ms-marketplace-token", "purchase-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": SUB_ID,
            "subscriptionName": "Contoso Analytics",
            "offerId": "analytics",
            "planId": "gold",
            "quantity": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolved = client(&server)
        .resolve_subscription("purchase-token", &CallOptions::new())
        .await
        .unwrap();

    assert_eq!(resolved.id.to_string(), SUB_ID);
    assert_eq!(resolved.plan_id.as_deref(), Some("gold"));
}

#[tokio::test]
async fn activate_sends_plan_and_acknowledges() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/subscriptions/{SUB_ID}/activate")))
        .and(body_json(serde_json::json!({"planId": "gold", "quantity": 10})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let details = ActivatedSubscription {
        plan_id: "gold".into(),
        quantity: Some(10),
    };

    let result = client(&server)
        .activate_subscription(
            Uuid::parse_str(SUB_ID).unwrap(),
            &details,
            &CallOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.status, 200);
}

#[tokio::test]
async fn operation_update_round_trips_the_operation_id() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("/subscriptions/{SUB_ID}/operations/{OP_ID}")))
        .and(body_json(serde_json::json!({"status": "Success"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": OP_ID,
            "subscriptionId": SUB_ID,
            "action": "ChangePlan",
            "status": "Succeeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let echoed = client(&server)
        .update_operation(
            Uuid::parse_str(SUB_ID).unwrap(),
            Uuid::parse_str(OP_ID).unwrap(),
            &OperationUpdate::success(),
            &CallOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(echoed.id.to_string(), OP_ID);
    assert_eq!(echoed.status, OperationStatus::Succeeded);
}

#[tokio::test]
async fn mock_version_parses_bare_operation_arrays() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/subscriptions/{SUB_ID}/operations")))
        .and(query_param("api-version", MOCK_API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": OP_ID, "subscriptionId": SUB_ID, "status": "InProgress"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let operations = client(&server)
        .with_api_version(MOCK_API_VERSION)
        .list_subscription_operations(Uuid::parse_str(SUB_ID).unwrap(), &CallOptions::new())
        .await
        .unwrap();

    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0].status, OperationStatus::InProgress);
}

#[tokio::test]
async fn production_version_parses_operation_envelopes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/operations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"id": OP_ID, "subscriptionId": SUB_ID, "status": "NotStarted"}],
            "nextLink": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let operations = client(&server)
        .list_operations(&CallOptions::new())
        .await
        .unwrap();

    assert_eq!(operations.len(), 1);
    assert_eq!(operations[0].status, OperationStatus::NotStarted);
}

#[tokio::test]
async fn cancelled_call_never_reaches_the_transport() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let opts = CallOptions::new().with_cancellation(cancel);

    let err = client(&server)
        .get_subscription(Uuid::parse_str(SUB_ID).unwrap(), &opts)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}
