mod common;

use common::wiremock_helpers::{
    doh_url, mock_doh_cname_server, mount_a_answer, mount_cname_answer, mount_empty_answer,
};
use std::time::Duration;
use subhawk::dns::{CnameSource, ResolverClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver_for(server_urls: Vec<String>) -> ResolverClient {
    ResolverClient::with_doh_urls(server_urls, Duration::from_secs(5))
}

#[tokio::test]
async fn test_resolve_cname_strips_trailing_dot() {
    let server =
        mock_doh_cname_server(&[("blog.example.com", &["myblog.ghost.io"])]).await;
    let resolver = resolver_for(vec![doh_url(&server)]);

    let cnames = resolver.resolve_cname("blog.example.com").await;
    assert_eq!(cnames, vec!["myblog.ghost.io".to_string()]);
}

#[tokio::test]
async fn test_resolve_cname_returns_full_chain() {
    let server = mock_doh_cname_server(&[(
        "shop.example.com",
        &["shop.example.com.cdn.cloudflare.net", "xyz.s3.amazonaws.com"],
    )])
    .await;
    let resolver = resolver_for(vec![doh_url(&server)]);

    let cnames = resolver.resolve_cname("shop.example.com").await;
    assert_eq!(cnames.len(), 2);
    assert_eq!(cnames[1], "xyz.s3.amazonaws.com");
}

#[tokio::test]
async fn test_healthy_empty_answer_resolves_to_no_cname() {
    let server = MockServer::start().await;
    mount_empty_answer(&server).await;
    let resolver = resolver_for(vec![doh_url(&server)]);

    let cnames = resolver.resolve_cname("plain.example.com").await;
    assert!(cnames.is_empty());
}

#[tokio::test]
async fn test_failing_server_is_rotated_past() {
    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;

    let healthy = MockServer::start().await;
    mount_cname_answer(&healthy, "app.example.com", &["abc.herokuapp.com"]).await;

    // First attempt hits the broken server, second rotates to the healthy one.
    let resolver = resolver_for(vec![doh_url(&broken), doh_url(&healthy)]);
    let cnames = resolver.resolve_cname("app.example.com").await;
    assert_eq!(cnames, vec!["abc.herokuapp.com".to_string()]);
}

#[tokio::test]
async fn test_empty_doh_pool_does_not_panic() {
    // No DoH servers configured at all: resolution skips straight to the
    // system-resolver fallback instead of dividing by zero on rotation.
    // RFC 2606 reserves .invalid, so the fallback cannot find records.
    let resolver = resolver_for(Vec::new());

    let cnames = resolver.resolve_cname("host.subhawk-test.invalid").await;
    assert!(cnames.is_empty());
    assert!(!resolver.host_exists("host.subhawk-test.invalid").await);
}

#[tokio::test]
async fn test_host_exists_with_a_record() {
    let server = MockServer::start().await;
    mount_a_answer(&server, "www.example.com", &["93.184.216.34"]).await;
    mount_empty_answer(&server).await;
    let resolver = resolver_for(vec![doh_url(&server)]);

    assert!(resolver.host_exists("www.example.com").await);
}

#[tokio::test]
async fn test_host_exists_false_without_a_record() {
    let server = MockServer::start().await;
    mount_empty_answer(&server).await;
    let resolver = resolver_for(vec![doh_url(&server)]);

    assert!(!resolver.host_exists("ghost.example.com").await);
}
