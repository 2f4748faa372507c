//! Common test utilities for REST API testing.

use std::sync::Arc;

use addressbook_persistence::backends::memory::MemoryBackend;
use addressbook_persistence::health::HealthStatusHandle;
use axum_test::TestServer;
use serde_json::{Value, json};

use addressbook_rest::{AppState, ServerConfig, create_app_with_state};

/// Contact API prefix.
pub const API: &str = "/api/v1/addressbook";

/// Creates a test server over a fresh in-memory backend.
pub fn create_test_server() -> (TestServer, Arc<MemoryBackend>) {
    create_test_server_with(ServerConfig::for_testing(), HealthStatusHandle::default())
}

/// Creates a test server with custom configuration and health handle.
pub fn create_test_server_with(
    config: ServerConfig,
    health: HealthStatusHandle,
) -> (TestServer, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::with_config(config.memory_config()));
    let state = AppState::new(Arc::clone(&backend), config).with_health(health);
    let app = create_app_with_state(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, backend)
}

/// Returns a valid contact body.
pub fn contact(first: &str, last: &str, email: &str, phone: &str) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "email": email,
        "phone": phone,
    })
}

/// Creates a contact through the API and returns its id.
pub async fn seed_contact(server: &TestServer, body: Value) -> String {
    let response = server.post(&format!("{}/user", API)).json(&body).await;
    response.assert_status_ok();
    response.json::<Value>()["id"]
        .as_str()
        .expect("create response has an id")
        .to_string()
}
