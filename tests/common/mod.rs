#![allow(dead_code)]

use std::time::Duration;
use vanguard_recon::ReconConfig;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the unblocking proxy endpoint served by `proxy_server`.
pub const PROXY_PATH: &str = "/raw";

/// Configuration for tests: short timeout, DoH pointed at `server`.
pub fn test_config(server: &MockServer) -> ReconConfig {
    ReconConfig {
        request_timeout: Duration::from_millis(500),
        doh_url: format!("{}/resolve", server.uri()),
        ..ReconConfig::default()
    }
}

/// Same as `test_config`, with every fetch routed through the mock proxy.
pub fn proxied_config(server: &MockServer) -> ReconConfig {
    ReconConfig {
        fetch_proxy: Some(format!("{}{PROXY_PATH}", server.uri())),
        ..test_config(server)
    }
}

/// Serves `body` as HTML with `status` when the proxy is asked for `target`.
pub async fn mount_proxied_page(server: &MockServer, target: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(PROXY_PATH))
        .and(query_param("url", target))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body.to_string(), "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

/// Serves a raw body with a content type when the proxy is asked for `target`.
pub async fn mount_proxied_body(server: &MockServer, target: &str, content_type: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(PROXY_PATH))
        .and(query_param("url", target))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), content_type))
        .mount(server)
        .await;
}

/// Answers a JSON DNS-over-HTTPS `A` query for `host` with `ip`.
pub async fn mount_doh_answer(server: &MockServer, host: &str, ip: &str) {
    let body = serde_json::json!({
        "Status": 0,
        "Question": [{ "name": format!("{host}."), "type": 1 }],
        "Answer": [{ "name": format!("{host}."), "type": 1, "TTL": 300, "data": ip }]
    });

    Mock::given(method("GET"))
        .and(path("/resolve"))
        .and(query_param("name", host))
        .and(query_param("type", "A"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/dns-json"))
        .mount(server)
        .await;
}

/// A server that answers every GET after `delay`.
pub async fn slow_server(delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("late").set_delay(delay))
        .mount(&server)
        .await;
    server
}
