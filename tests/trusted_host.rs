mod common;

use axum::http::{Method, StatusCode};
use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tower::ServiceExt;
use wss13_framework::SetupError;
use wss13_framework::config::SecurityConfig;
use wss13_framework::routes::configure_app;

fn tracking_app(settings: &SecurityConfig) -> (Router, Arc<AtomicBool>) {
    let called = Arc::new(AtomicBool::new(false));
    let flag = called.clone();

    let router = Router::new().route(
        "/",
        get(move || {
            let flag = flag.clone();
            async move {
                flag.store(true, Ordering::SeqCst);
                "ok"
            }
        }),
    );

    (common::configured(router, settings), called)
}

#[tokio::test]
async fn test_untrusted_host_rejected_before_handler() {
    let (app, called) = tracking_app(&SecurityConfig::default());

    let response = app
        .oneshot(common::request(Method::GET, "/", Some("evil.example.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!called.load(Ordering::SeqCst));

    let json = common::body_json(response).await;
    assert_eq!(json["error"]["code"], "invalid_host");
    assert_eq!(json["error"]["message"], "Invalid host header");
    assert_eq!(json["error"]["details"]["host"], "evil.example.com");
}

#[tokio::test]
async fn test_allowed_hosts_reach_handler() {
    for host in [
        "wss13.com.br",
        "api.wss13.com.br",
        "www.wss13.com.br:443",
        "localhost:3000",
        "127.0.0.1",
        "LOCALHOST",
    ] {
        let (app, called) = tracking_app(&SecurityConfig::default());

        let response = app
            .oneshot(common::request(Method::GET, "/", Some(host)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "host {host}");
        assert!(called.load(Ordering::SeqCst), "host {host}");
    }
}

#[tokio::test]
async fn test_lookalike_hosts_rejected() {
    for host in ["wss13.com.br.evil.com", "evilwss13.com.br", "localhost.evil", ""] {
        let (app, called) = tracking_app(&SecurityConfig::default());

        let response = app
            .oneshot(common::request(Method::GET, "/", Some(host)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "host {host:?}");
        assert!(!called.load(Ordering::SeqCst), "host {host:?}");
    }
}

#[tokio::test]
async fn test_missing_host_rejected() {
    let (app, called) = tracking_app(&SecurityConfig::default());

    let response = app
        .oneshot(common::request(Method::GET, "/", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_uri_authority_used_without_host_header() {
    let (app, called) = tracking_app(&SecurityConfig::default());

    let response = app
        .oneshot(common::request(Method::GET, "http://wss13.com.br/", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_www_redirect() {
    let settings = SecurityConfig {
        allowed_hosts: vec!["www.example.com".to_string()],
        ..SecurityConfig::default()
    };
    let (app, called) = tracking_app(&settings);

    let response = app
        .oneshot(common::request(
            Method::GET,
            "/path?x=1",
            Some("example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()["location"],
        "http://www.example.com/path?x=1"
    );
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_www_redirect_disabled() {
    let settings = SecurityConfig {
        allowed_hosts: vec!["www.example.com".to_string()],
        www_redirect: false,
        ..SecurityConfig::default()
    };
    let (app, _) = tracking_app(&settings);

    let response = app
        .oneshot(common::request(Method::GET, "/", Some("example.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wildcard_allows_any_host() {
    let settings = SecurityConfig {
        allowed_hosts: vec!["*".to_string()],
        ..SecurityConfig::default()
    };
    let (app, called) = tracking_app(&settings);

    let response = app
        .oneshot(common::request(Method::GET, "/", Some("anything.test")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(called.load(Ordering::SeqCst));
}

#[test]
fn test_malformed_pattern_fails_setup() {
    let settings = SecurityConfig {
        allowed_hosts: vec!["wss13.com.br".to_string(), "api.*.com".to_string()],
        ..SecurityConfig::default()
    };

    let result = configure_app(Router::new(), &settings);

    assert!(matches!(
        result,
        Err(SetupError::InvalidHostPattern { ref pattern, .. }) if pattern == "api.*.com"
    ));
}

#[test]
fn test_empty_host_list_fails_setup() {
    let settings = SecurityConfig {
        allowed_hosts: vec![],
        ..SecurityConfig::default()
    };

    assert!(matches!(
        configure_app(Router::new(), &settings),
        Err(SetupError::EmptyHostList)
    ));
}
