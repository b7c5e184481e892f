mod common;

use common::{PROXY_PATH, mount_doh_answer, mount_proxied_body, mount_proxied_page, proxied_config};
use vanguard_recon::core::models::Protocol;
use vanguard_recon::{ReconEngine, ReconError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CT_TARGET: &str =
    "https://api.certspotter.com/v1/issuances?domain=example.com&include_subdomains=true&expand=dns_names";
const HT_TARGET: &str = "https://api.hackertarget.com/hostsearch/?q=example.com";

#[tokio::test]
async fn end_to_end_through_a_proxy() {
    let server = MockServer::start().await;

    mount_proxied_body(
        &server,
        CT_TARGET,
        "application/json",
        r#"[{"dns_names":["example.com","www.example.com","shop.example.com"]}]"#,
    )
    .await;
    mount_proxied_body(&server, HT_TARGET, "text/plain", "blog.example.com,192.0.2.7\nshop.example.com,192.0.2.8").await;

    mount_proxied_page(&server, "https://www.example.com", 200, "<title>Example</title>").await;
    // Following this redirect would land on the 200 page above.
    Mock::given(method("GET"))
        .and(path(PROXY_PATH))
        .and(query_param("url", "https://shop.example.com"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}{PROXY_PATH}?url=https://www.example.com", server.uri())),
        )
        .mount(&server)
        .await;
    mount_proxied_page(&server, "https://blog.example.com", 502, "").await;
    mount_proxied_page(&server, "http://blog.example.com", 200, "<title>  The\n Blog </title>").await;
    mount_proxied_page(
        &server,
        "https://example.com",
        200,
        r#"<html><head><meta name="generator" content="WordPress 6.4.2"></head>
           <body><a href="https://www.linkedin.com/company/example-inc">in</a></body></html>"#,
    )
    .await;

    mount_doh_answer(&server, "www.example.com", "192.0.2.1").await;
    mount_doh_answer(&server, "blog.example.com", "192.0.2.7").await;

    let engine = ReconEngine::from_config(proxied_config(&server)).unwrap();
    let report = engine.run("example.com").await.unwrap();

    let hosts: Vec<&str> = report.subdomains.iter().map(|s| s.hostname.as_str()).collect();
    assert_eq!(hosts, vec!["blog.example.com", "www.example.com"]);

    let blog = &report.subdomains[0];
    assert_eq!(blog.protocol, Protocol::Http);
    assert_eq!(blog.page_title.as_deref(), Some("The Blog"));
    assert_eq!(blog.resolved_ip.as_deref(), Some("192.0.2.7"));
    assert_eq!(blog.source, "HackerTarget");

    let www = &report.subdomains[1];
    assert_eq!(www.protocol, Protocol::Https);
    assert_eq!(www.source, "Certificate Transparency");
    assert_eq!(www.resolved_ip.as_deref(), Some("192.0.2.1"));

    let wordpress = report.technologies.iter().find(|t| t.name == "WordPress").unwrap();
    assert_eq!(wordpress.category, "CMS");

    assert_eq!(report.social_profiles.len(), 1);
    assert_eq!(report.social_profiles[0].platform, "LinkedIn");
    assert_eq!(report.social_profiles[0].username, "example-inc");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["domain"], "example.com");
    assert_eq!(json["subdomains"][0]["protocol"], "http");
}

#[tokio::test]
async fn invalid_input_is_the_only_error() {
    let server = MockServer::start().await;
    let engine = ReconEngine::from_config(proxied_config(&server)).unwrap();

    let err = engine.run("http://").await.unwrap_err();
    assert!(matches!(err, ReconError::InvalidDomain(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
