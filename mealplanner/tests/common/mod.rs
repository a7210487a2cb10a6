// Shared helpers for the API integration tests
#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use mealplanner::config::ApiConfig;
use mealplanner::gateway::AuthGateway;
use mealplanner::http::ApiClient;
use mealplanner::session::{MemorySessionStore, Session, SessionHandle};
use serde_json::{json, Value};
use wiremock::MockServer;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const TEST_TOKEN: &str = "test-token-abc123";

pub fn api_config(server: &MockServer, timeout: Duration) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        timeout_secs: timeout.as_secs().max(1),
    }
}

/// Client with no session.
pub fn anonymous_client(server: &MockServer) -> ApiClient {
    init_test_logger();
    ApiClient::new(&api_config(server, Duration::from_secs(5)), SessionHandle::default())
        .expect("client")
}

/// Client already holding [`TEST_TOKEN`].
pub fn authed_client(server: &MockServer) -> ApiClient {
    let api = anonymous_client(server);
    api.session().set(Session::new(
        TEST_TOKEN.to_string(),
        Some("sam".to_string()),
        Some("Sam".to_string()),
    ));
    api
}

pub fn auth_gateway(api: &ApiClient) -> (AuthGateway, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    (AuthGateway::new(api.clone(), store.clone()), store)
}

pub fn pantry_item(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

pub fn meal(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "ingredients": ["Rice", "Olive Oil"],
        "instructions": "1. Cook rice\n2. Add oil",
        "nutrients": { "calories": 420.0, "protein": 8.0, "carbs": 70.0, "fat": 12.0 },
        "prep_time": 5,
        "cook_time": 20,
        "image": null
    })
}

pub fn plan(id: i64, start_date: &str, items: Value) -> Value {
    json!({ "id": id, "user_id": 1, "start_date": start_date, "items": items })
}
