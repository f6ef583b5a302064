mod common;

use axum::http::{HeaderValue, Method, header};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use axum_test::{TestResponse, TestServer};
use wss13_framework::config::SecurityConfig;

const CSP: &str = "default-src 'self'; script-src 'self' 'unsafe-inline' 'unsafe-eval' https://cdn.jsdelivr.net https://cdnjs.cloudflare.com; style-src 'self' 'unsafe-inline' https://fonts.googleapis.com https://cdn.jsdelivr.net; font-src 'self' https://fonts.gstatic.com; img-src 'self' data: https: blob:; connect-src 'self' https://api.wss13.com.br wss://wss13.com.br; frame-ancestors 'none'; base-uri 'self'; form-action 'self';";

fn assert_security_headers(response: &TestResponse) {
    response.assert_header(
        "strict-transport-security",
        "max-age=31536000; includeSubDomains; preload",
    );
    response.assert_header("x-content-type-options", "nosniff");
    response.assert_header("x-frame-options", "DENY");
    response.assert_header("x-xss-protection", "1; mode=block");
    response.assert_header("referrer-policy", "strict-origin-when-cross-origin");
    response.assert_header(
        "permissions-policy",
        "geolocation=(), microphone=(), camera=()",
    );
    response.assert_header("content-security-policy", CSP);
    response.assert_header("x-powered-by", "WSS13-Framework");

    let timing = response.header("x-response-time");
    assert!(
        is_response_time(timing.to_str().unwrap()),
        "unexpected X-Response-Time: {timing:?}"
    );
}

fn is_response_time(value: &str) -> bool {
    let Some(number) = value.strip_suffix("ms") else {
        return false;
    };
    let Some((whole, fraction)) = number.split_once('.') else {
        return false;
    };

    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.len() == 2
        && fraction.chars().all(|c| c.is_ascii_digit())
}

#[tokio::test]
async fn test_get_response_carries_all_headers() {
    let server = common::test_server(&SecurityConfig::default());

    let response = server.get("/").await;

    response.assert_status_ok();
    assert_security_headers(&response);
    response.assert_header("cache-control", "public, max-age=3600");
}

#[tokio::test]
async fn test_non_get_methods_are_not_cached() {
    let server = common::test_server(&SecurityConfig::default());

    for method in [
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
        Method::HEAD,
    ] {
        let response = server.method(method.clone(), "/health").await;

        assert_eq!(
            response.header("cache-control"),
            "no-cache",
            "method {method}"
        );
        assert_eq!(response.header("x-powered-by"), "WSS13-Framework");
    }
}

#[tokio::test]
async fn test_headers_overwrite_handler_values() {
    let app = Router::new().route(
        "/custom",
        get(|| async {
            (
                [
                    (header::CACHE_CONTROL, HeaderValue::from_static("private, max-age=60")),
                    (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
                    (
                        header::CONTENT_SECURITY_POLICY,
                        HeaderValue::from_static("default-src *"),
                    ),
                ],
                "custom",
            )
                .into_response()
        }),
    );
    let server = TestServer::new(common::configured(app, &SecurityConfig::default())).unwrap();

    let response = server.get("/custom").await;

    response.assert_status_ok();
    response.assert_header("cache-control", "public, max-age=3600");
    response.assert_header("x-frame-options", "DENY");
    response.assert_header("content-security-policy", CSP);
}

#[tokio::test]
async fn test_not_found_response_carries_headers() {
    let server = common::test_server(&SecurityConfig::default());

    let response = server.get("/does-not-exist").await;

    response.assert_status_not_found();
    assert_security_headers(&response);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["path"], "/does-not-exist");
}

#[tokio::test]
async fn test_rejected_host_response_carries_headers() {
    let server = common::test_server(&SecurityConfig::default());

    let response = server
        .get("/")
        .add_header("host", "evil.example.com")
        .await;

    response.assert_status_bad_request();
    assert_security_headers(&response);
    response.assert_header("cache-control", "public, max-age=3600");
}

#[tokio::test]
async fn test_handler_errors_pass_through_unchanged() {
    let app = Router::new().route(
        "/fail",
        get(|| async {
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                "maintenance",
            )
        }),
    );
    let server = TestServer::new(common::configured(app, &SecurityConfig::default())).unwrap();

    let response = server.get("/fail").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.text(), "maintenance");
    assert_security_headers(&response);
}

#[test]
fn test_response_time_format_check() {
    assert!(is_response_time("0.00ms"));
    assert!(is_response_time("123.45ms"));
    assert!(!is_response_time("1.2ms"));
    assert!(!is_response_time("1.234ms"));
    assert!(!is_response_time("12ms"));
    assert!(!is_response_time("-1.00ms"));
    assert!(!is_response_time("1.00"));
}
