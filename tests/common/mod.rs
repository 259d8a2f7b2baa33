//! Common test utilities for integration tests.
//!
//! Fixtures for building clients against a wiremock server or the scripted
//! mock transport, plus canned backend payloads.
//!
//! # Example
//!
//! ```ignore
//! let server = MockServer::start().await;
//! let (client, provider) = signed_in_client(&server, "A", "B").await;
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{json, Value};
use wiremock::MockServer;

use sigmalite::adapters::mock::{InMemoryCredentials, MockHttpClient};
use sigmalite::adapters::ReqwestHttpClient;
use sigmalite::api::ApiClient;
use sigmalite::auth::TokenStore;
use sigmalite::models::CredentialPair;

/// Build a JWT-shaped token whose payload is readable but unsigned.
pub fn make_jwt(sub: i64, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({"sub": sub, "exp": exp, "type": "access"}).to_string(),
    );
    format!("{}.{}.test-signature", header, payload)
}

/// Client using the real reqwest transport against `server`.
pub fn client_for(server: &MockServer, provider: &InMemoryCredentials) -> ApiClient {
    let store = TokenStore::new(Arc::new(provider.clone()));
    ApiClient::new(
        server.uri(),
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(store),
    )
}

/// Client against `server` with a session already in place.
pub async fn signed_in_client(
    server: &MockServer,
    access: &str,
    refresh: &str,
) -> (ApiClient, InMemoryCredentials) {
    let provider = InMemoryCredentials::new();
    let client = client_for(server, &provider);
    client
        .store()
        .set_session(
            CredentialPair::new(access.to_string(), refresh.to_string()),
            None,
        )
        .await;
    (client, provider)
}

/// Client using the scripted mock transport.
pub async fn mock_client(
    base_url: &str,
    http: &MockHttpClient,
    tokens: Option<(&str, &str)>,
) -> ApiClient {
    let store = TokenStore::new(Arc::new(InMemoryCredentials::new()));
    if let Some((access, refresh)) = tokens {
        store
            .set_session(
                CredentialPair::new(access.to_string(), refresh.to_string()),
                None,
            )
            .await;
    }
    ApiClient::new(base_url, Arc::new(http.clone()), Arc::new(store))
}

pub fn token_pair_json(access: &str, refresh: &str) -> Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer"
    })
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{}@example.com", username),
        "username": username,
        "full_name": null,
        "is_active": true,
        "is_superuser": false,
        "created_at": "2024-05-01T10:00:00.123456",
        "updated_at": null
    })
}

pub fn dataset_json(id: i64, name: &str, rows: i64, columns: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "file_name": format!("{}.csv", name),
        "file_size": 4096,
        "row_count": rows,
        "column_count": columns,
        "schema": null,
        "owner_id": 1,
        "created_at": "2024-05-01T10:00:00",
        "updated_at": null
    })
}

pub fn sheet_json(id: i64, name: &str, dataset_id: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "dataset_id": dataset_id,
        "owner_id": 1,
        "config": {},
        "created_at": "2024-05-02T09:30:00",
        "updated_at": null
    })
}

pub fn chart_json(id: i64, name: &str, sheet_id: i64, chart_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "chart_type": chart_type,
        "sheet_id": sheet_id,
        "owner_id": 1,
        "config": {"x_axis": "month", "y_axis": "revenue"},
        "created_at": "2024-05-02T09:45:00",
        "updated_at": "2024-05-03T12:00:00Z"
    })
}

/// A CSV with a header and `rows` data lines over five columns.
pub fn sales_csv(rows: usize) -> String {
    let mut csv = String::from("date,region,product,units,amount\n");
    for i in 0..rows {
        csv.push_str(&format!(
            "2024-01-{:02},region-{},widget-{},{},{}.50\n",
            i % 28 + 1,
            i % 4,
            i % 7,
            i + 1,
            (i + 1) * 10
        ));
    }
    csv
}
