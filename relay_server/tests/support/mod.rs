// Shared helpers for booting the relay against a mock upstream.
#![allow(dead_code)]

use relay_server::{ApiKey, RelayConfig};
use std::net::IpAddr;
use std::path::PathBuf;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-2.5-pro";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-pro:generateContent";

// Config pointing the relay at `upstream` with no system instruction.
pub fn test_config(upstream: &str, static_dir: PathBuf) -> RelayConfig {
    RelayConfig {
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        api_key: ApiKey::new(TEST_API_KEY),
        model: TEST_MODEL.to_string(),
        api_base_url: upstream.to_string(),
        static_dir,
        system_instruction: None,
    }
}

// Start the relay on an ephemeral port and return its base URL.
pub async fn spawn_server(config: RelayConfig) -> String {
    // Bind before spawning so the socket is accepting by the time we return.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        relay_server::run(listener, config)
            .await
            .expect("server failed");
    });

    format!("http://{addr}")
}

// Address with nothing listening on it.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn text_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}
