mod common;

use common::{PROXY_PATH, proxied_config, test_config};
use std::sync::Arc;
use vanguard_recon::core::error::SourceError;
use vanguard_recon::core::fetch::{ContentFetcher, HttpFetcher};
use vanguard_recon::core::scanner::sources::{
    CertSpotterProvider, HackerTargetProvider, SecurityTrailsProvider, SourceAggregator, SourceProvider,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(server: &MockServer) -> Arc<dyn ContentFetcher> {
    Arc::new(HttpFetcher::new(&test_config(server)).unwrap())
}

async fn mount_cert_spotter(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/issuances"))
        .and(query_param("domain", "example.com"))
        .and(query_param("include_subdomains", "true"))
        .and(query_param("expand", "dns_names"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_hackertarget(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/hostsearch/"))
        .and(query_param("q", "example.com"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn cert_spotter_collects_dns_names() {
    let server = MockServer::start().await;
    mount_cert_spotter(
        &server,
        serde_json::json!([
            { "id": "1", "dns_names": ["example.com", "www.example.com"] },
            { "id": "2", "dns_names": ["*.api.example.com", "www.example.com"] },
            { "id": "3" }
        ]),
    )
    .await;

    let provider = CertSpotterProvider::with_base_url(fetcher(&server), &server.uri());
    let names = provider.subdomains("example.com").await.unwrap();

    assert_eq!(names, vec!["*.api.example.com", "example.com", "www.example.com"]);
}

#[tokio::test]
async fn cert_spotter_rate_limit_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = CertSpotterProvider::with_base_url(fetcher(&server), &server.uri());
    let err = provider.subdomains("example.com").await.unwrap_err();

    assert!(matches!(err, SourceError::Status { status: 429, .. }));
}

#[tokio::test]
async fn hackertarget_reads_the_first_csv_field() {
    let server = MockServer::start().await;
    mount_hackertarget(&server, 200, "mail.example.com,192.0.2.3\nvpn.example.com,192.0.2.4\n").await;

    let provider = HackerTargetProvider::with_base_url(fetcher(&server), &server.uri());
    let names = provider.subdomains("example.com").await.unwrap();

    assert_eq!(names, vec!["mail.example.com", "vpn.example.com"]);
}

#[tokio::test]
async fn hackertarget_quota_message_is_an_upstream_error() {
    let server = MockServer::start().await;
    mount_hackertarget(&server, 200, "API count exceeded - Increase Quota with Membership").await;

    let provider = HackerTargetProvider::with_base_url(fetcher(&server), &server.uri());
    let err = provider.subdomains("example.com").await.unwrap_err();

    assert!(matches!(err, SourceError::Upstream { .. }));
}

#[tokio::test]
async fn securitytrails_sends_the_key_and_qualifies_labels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/domain/example.com/subdomains"))
        .and(header("apikey", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "endpoint": "/v1/domain/example.com/subdomains",
            "subdomains": ["www", "api.v2"]
        })))
        .mount(&server)
        .await;

    let provider =
        SecurityTrailsProvider::with_base_url(fetcher(&server), Some("secret"), &server.uri()).unwrap();
    let names = provider.subdomains("example.com").await.unwrap();

    assert_eq!(names, vec!["www.example.com", "api.v2.example.com"]);
}

#[tokio::test]
async fn securitytrails_without_a_key_cannot_be_built() {
    let server = MockServer::start().await;

    for key in [None, Some(""), Some("   ")] {
        let result = SecurityTrailsProvider::with_base_url(fetcher(&server), key, &server.uri());
        assert!(matches!(result, Err(SourceError::MissingCredentials(_))));
    }
}

#[tokio::test]
async fn aggregation_survives_a_failing_source() {
    let server = MockServer::start().await;
    mount_cert_spotter(
        &server,
        serde_json::json!([{ "dns_names": ["WWW.Example.com.", "shop.example.com", "example.org"] }]),
    )
    .await;
    mount_hackertarget(&server, 500, "internal error").await;

    let fetcher = fetcher(&server);
    let aggregator = SourceAggregator::new(vec![
        Box::new(CertSpotterProvider::with_base_url(fetcher.clone(), &server.uri())),
        Box::new(HackerTargetProvider::with_base_url(fetcher, &server.uri())),
    ]);

    let candidates = aggregator.discover("example.com").await;
    let hosts: Vec<&str> = candidates.iter().map(|c| c.hostname.as_str()).collect();

    assert_eq!(hosts, vec!["shop.example.com", "www.example.com"]);
    assert!(candidates.iter().all(|c| c.sources == vec!["Certificate Transparency"]));
}

#[tokio::test]
async fn securitytrails_key_never_reaches_the_proxy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/domain/example.com/subdomains"))
        .and(header("apikey", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "subdomains": ["www"] })))
        .expect(1)
        .mount(&server)
        .await;

    let proxied: Arc<dyn ContentFetcher> = Arc::new(HttpFetcher::new(&proxied_config(&server)).unwrap());
    let provider = SecurityTrailsProvider::with_base_url(proxied, Some("secret"), &server.uri()).unwrap();
    let names = provider.subdomains("example.com").await.unwrap();

    assert_eq!(names, vec!["www.example.com"]);
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != PROXY_PATH));
}
