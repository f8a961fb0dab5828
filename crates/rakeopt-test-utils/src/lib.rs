//! Shared test utilities for rakeopt integration tests.
//!
//! Provides canned optimization requests, envelope builders, and a fake
//! Gemini endpoint backed by `wiremock`. Each test starts its own
//! [`FakeGemini`], so tests never share server state.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rakeopt_core::{GeminiClient, GeminiConfig, OptimizationRequest};

/// Credential used by every fake-server test.
pub const TEST_API_KEY: &str = "test-api-key";

/// Config source holding only the test credential.
pub fn env_with_key() -> HashMap<String, String> {
    HashMap::from([(
        GeminiConfig::API_KEY_VAR.to_string(),
        TEST_API_KEY.to_string(),
    )])
}

/// Config source with nothing set.
pub fn empty_env() -> HashMap<String, String> {
    HashMap::new()
}

/// The two-order request used by the service's smoke test.
pub fn sample_request() -> OptimizationRequest {
    serde_json::from_value(json!({
        "orders": [
            {"order_id": "ORD-TEST-1", "material": "HR Coil", "quantity": 420, "due_date": "2025-10-14", "priority": "High", "destination": "Delhi"},
            {"order_id": "ORD-TEST-2", "material": "CR Sheet", "quantity": 300, "due_date": "2025-10-15", "priority": "Medium", "destination": "Mumbai"}
        ],
        "stockyards": [
            {"stockyard": "Yard-A", "material": "HR Coil", "quantity_available": 600, "loading_point": "LP-1", "transport_cost_per_ton": 18},
            {"stockyard": "Yard-B", "material": "CR Sheet", "quantity_available": 450, "loading_point": "LP-2", "transport_cost_per_ton": 19}
        ],
        "loading_points": [
            {"loading_point": "LP-1", "siding": "Siding-Alpha", "daily_capacity_ton": 600},
            {"loading_point": "LP-2", "siding": "Siding-Beta", "daily_capacity_ton": 500}
        ],
        "rakes": [
            {"rake_id": "Rake-01", "wagon_type": "BOXN", "wagons_available": 40, "wagon_capacity_ton": 58, "loading_point": "LP-1"},
            {"rake_id": "Rake-02", "wagon_type": "BOXNHL", "wagons_available": 45, "wagon_capacity_ton": 60, "loading_point": "LP-2"}
        ],
        "costs": [
            {"material": "HR Coil", "destination": "Delhi", "transport_cost_per_ton": 22, "loading_cost_per_ton": 4, "penalty_cost_per_ton": 12},
            {"material": "CR Sheet", "destination": "Mumbai", "transport_cost_per_ton": 26, "loading_cost_per_ton": 5, "penalty_cost_per_ton": 14}
        ],
        "constraints": {"minRakeTonnage": 1800, "sidingCapacity": 600},
        "wagon_availability": {"BOXN": true, "BOXNHL": true, "BRN": false}
    }))
    .expect("sample request is valid")
}

/// One order, one stockyard, one loading point, one rake.
pub fn minimal_request() -> OptimizationRequest {
    serde_json::from_value(minimal_request_json()).expect("minimal request is valid")
}

/// JSON form of [`minimal_request`], for HTTP tests.
pub fn minimal_request_json() -> Value {
    json!({
        "orders": [{"order_id": "ORD-1", "material": "HR Coil", "quantity": 420, "destination": "Delhi"}],
        "stockyards": [{"stockyard": "Yard-A", "material": "HR Coil", "quantity_available": 600, "loading_point": "LP-1"}],
        "loading_points": [{"loading_point": "LP-1", "daily_capacity_ton": 600}],
        "rakes": [{"rake_id": "Rake-01", "wagon_type": "BOXN", "wagons_available": 40, "wagon_capacity_ton": 58, "loading_point": "LP-1"}]
    })
}

/// A result carrying every required key with empty values.
pub fn empty_result() -> Value {
    json!({
        "plan": [],
        "totals": {},
        "cost_by_destination": {},
        "utilization": [],
        "dispatch_schedule": [],
        "matrix": {},
        "suggestions": [],
        "unfulfilled_orders": []
    })
}

/// A `generateContent` envelope whose single part carries `text`.
pub fn envelope_with_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 512, "candidatesTokenCount": 64, "totalTokenCount": 576}
    })
}

// ---------------------------------------------------------------------------
// Fake Gemini server
// ---------------------------------------------------------------------------

/// A local stand-in for the Gemini API.
pub struct FakeGemini {
    server: MockServer,
}

impl FakeGemini {
    /// Path served for the default model and API version.
    pub const DEFAULT_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Client pointed at this server with a short timeout.
    pub fn client(&self) -> GeminiClient {
        self.client_with_timeout(Duration::from_secs(5))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> GeminiClient {
        GeminiClient::with_base_url(self.uri(), timeout).expect("client should build")
    }

    /// Answer every default-model call with `template`.
    pub async fn respond_with(&self, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(Self::DEFAULT_PATH))
            .and(query_param("key", TEST_API_KEY))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Mount a custom mock (e.g. for a non-default model path).
    pub async fn mount(&self, mock: Mock) {
        mock.mount(&self.server).await;
    }

    /// Answer with a well-formed envelope whose text is `text`.
    pub async fn reply_with_text(&self, text: &str) {
        self.respond_with(ResponseTemplate::new(200).set_body_json(envelope_with_text(text)))
            .await;
    }

    /// Fail the test on drop if any call reaches the server.
    pub async fn expect_no_calls(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// Bodies of all requests received so far, parsed as JSON.
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("request body is JSON"))
            .collect()
    }

    pub async fn received_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}
