#![allow(dead_code)]

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request};
use axum::{Router, routing::get};
use axum_test::TestServer;
use std::net::SocketAddr;
use tower::Layer;
use wss13_framework::config::SecurityConfig;
use wss13_framework::routes::{app_router, configure_app};

pub const TEST_PEER: &str = "127.0.0.1:12345";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        if req.extensions().get::<ConnectInfo<SocketAddr>>().is_none() {
            let addr: SocketAddr = TEST_PEER.parse().unwrap();
            req.extensions_mut().insert(ConnectInfo(addr));
        }
        self.inner.call(req)
    }
}

/// The full application router, as served in production.
pub fn test_app(settings: &SecurityConfig) -> Router {
    app_router(settings).unwrap().layer(MockConnectInfoLayer)
}

/// Arbitrary routes wrapped in the security stack.
pub fn configured(router: Router, settings: &SecurityConfig) -> Router {
    configure_app(router, settings)
        .unwrap()
        .layer(MockConnectInfoLayer)
}

pub fn test_server(settings: &SecurityConfig) -> TestServer {
    TestServer::new(test_app(settings)).unwrap()
}

/// Routes returning plain-text bodies of a given size.
pub fn sized_body_routes() -> Router {
    Router::new()
        .route("/bytes/500", get(|| async { "a".repeat(500) }))
        .route("/bytes/999", get(|| async { "a".repeat(999) }))
        .route("/bytes/1000", get(|| async { "a".repeat(1000) }))
        .route("/bytes/1500", get(|| async { "a".repeat(1500) }))
}

pub fn request(method: Method, uri: &str, host: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(host) = host {
        builder = builder.header("host", host);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn request_from(peer: &str, uri: &str, host: &str) -> Request<Body> {
    let mut req = request(Method::GET, uri, Some(host));
    let addr: SocketAddr = peer.parse().unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
