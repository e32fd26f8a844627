#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use aquago_driver::config::{ClientOptions, DriverConfig};
use aquago_driver::store::LocalStore;
use aquago_driver::AquaGo;
use wiremock::MockServer;

pub const DRIVER_ID: &str = "driver-1";

/// One mock server standing in for Supabase, Cloudinary and the Distance Matrix API
pub fn config_for(server: &MockServer, cache_path: &Path) -> DriverConfig {
    DriverConfig {
        supabase_url: server.uri(),
        supabase_key: "anon-key".to_string(),
        cloudinary_base_url: server.uri(),
        cloudinary_cloud_name: "demo".to_string(),
        cloudinary_upload_preset: "driver-docs".to_string(),
        distance_base_url: server.uri(),
        distance_api_key: "maps-key".to_string(),
        cache_path: cache_path.to_path_buf(),
    }
}

pub async fn setup(server: &MockServer, dir: &Path) -> (AquaGo, Arc<LocalStore>) {
    let config = config_for(server, &dir.join("session.json"));
    let app = AquaGo::from_config(&config, ClientOptions::default()).unwrap();
    let store = Arc::new(LocalStore::open(&config.cache_path).await.unwrap());
    (app, store)
}

pub fn session_json(user_id: &str) -> Value {
    json!({
        "access_token": "user-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-token",
        "user": {
            "id": user_id,
            "email": "driver@example.com",
            "role": "authenticated"
        }
    })
}

pub fn order_json(id: &str, volume: f64, status: &str, location: &str) -> Value {
    json!({
        "id": id,
        "delivery_address": format!(
            "{{\"name\":\"Customer {id}\",\"number\":\"9876543210\",\"address\":\"12 MG Road\",\"id\":\"{id}\"}}"
        ),
        "delivery_location": location,
        "volume": volume,
        "amount": 450,
        "status": status,
        "selected_container_id": DRIVER_ID,
        "created_at": "2024-03-05T10:30:00+00:00"
    })
}

pub fn matrix_json(text: &str, meters: u64) -> Value {
    json!({
        "status": "OK",
        "origin_addresses": ["Origin"],
        "destination_addresses": ["Destination"],
        "rows": [{
            "elements": [{
                "status": "OK",
                "distance": { "text": text, "value": meters },
                "duration": { "text": "1 hour 5 mins", "value": 3900 }
            }]
        }]
    })
}

pub fn matrix_element_failure(status: &str) -> Value {
    json!({
        "status": "OK",
        "rows": [{ "elements": [{ "status": status }] }]
    })
}

/// A cached session whose access token expires `seconds` from now (negative for the past)
pub fn expiring_session_json(user_id: &str, seconds: i64) -> Value {
    let mut session = session_json(user_id);
    session["access_token"] = json!("stale-token");
    session["expires_at"] = json!(chrono::Utc::now().timestamp() + seconds);
    session
}

/// What GoTrue returns for `grant_type=refresh_token`
pub fn refreshed_session_json(user_id: &str) -> Value {
    let mut session = session_json(user_id);
    session["access_token"] = json!("fresh-token");
    session["refresh_token"] = json!("next-refresh-token");
    session
}

pub async fn mount_refresh(server: &MockServer, status: u16, expected_calls: u64) {
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    let response = if status == 200 {
        ResponseTemplate::new(200).set_body_json(refreshed_session_json(DRIVER_ID))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        }))
    };
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "refresh-token" })))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}
