#![allow(dead_code)]

pub mod clock;

use std::sync::Once;

use modmed_gateway::Credentials;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub fn credentials(server_uri: &str) -> Credentials {
    Credentials {
        base_url: server_uri.to_string(),
        firm_url_prefix: "firm-abc".to_string(),
        api_key: "key-abc".to_string(),
        username: "svc-user".to_string(),
        password: "svc-pass".to_string(),
    }
}

pub fn grant_body(token: &str, expires_in: i64) -> String {
    serde_json::json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in,
    })
    .to_string()
}
