//! Middleware stack integration tests
//!
//! Security headers, per-IP rate limiting and 500 rendering, exercised
//! through the full router.

mod common;

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    routing::get as get_route,
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{send_from, test_app, test_app_limited, CLIENT_ADDR};
use homeshare::backend::middleware::SECURITY_HEADERS;
use homeshare::backend::routes::with_middleware;
use homeshare::backend::server::{AppState, Config, Environment};
use homeshare::backend::store::MemoryStore;

async fn kaboom() -> &'static str {
    panic!("kaboom")
}

/// The production middleware stack around a route that panics
fn panicking_app(environment: Environment) -> Router {
    let config = Config {
        environment,
        ..Config::default()
    };
    let app_state = AppState::new(Arc::new(MemoryStore::new()), config);
    with_middleware(Router::new().route("/kaboom", get_route(kaboom)), app_state)
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = test_app();

    for uri in ["/", "/api/nowhere", "/api/auth/profile"] {
        let (_, headers, _) = send_from(&app, CLIENT_ADDR, Method::GET, uri, None, None).await;
        for (name, value) in SECURITY_HEADERS {
            assert_eq!(headers.get(*name).unwrap(), *value, "{name} on {uri}");
        }
    }
}

#[tokio::test]
async fn test_security_header_values() {
    let app = test_app();

    let (_, headers, _) = send_from(&app, CLIENT_ADDR, Method::GET, "/", None, None).await;

    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN");
    assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
    assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
}

#[tokio::test]
async fn test_rate_limit_per_client_ip() {
    let app = test_app_limited(3);
    let alice = "198.51.100.1:5000";
    let bob = "198.51.100.2:5000";

    for _ in 0..3 {
        let (status, _, _) = send_from(&app, alice, Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, headers, body) = send_from(&app, alice, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body,
        json!({"message": "Too many requests, please try again later."})
    );
    assert!(headers.contains_key(header::RETRY_AFTER));
    // Rejected responses still carry the hardening headers
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

    // Another address has its own budget
    let (status, _, _) = send_from(&app, bob, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_counts_every_route() {
    let app = test_app_limited(2);

    send_from(&app, CLIENT_ADDR, Method::GET, "/api/nowhere", None, None).await;
    send_from(&app, CLIENT_ADDR, Method::GET, "/api/listings", None, None).await;
    let (status, _, _) = send_from(&app, CLIENT_ADDR, Method::GET, "/", None, None).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_panic_detail_in_development() {
    let app = panicking_app(Environment::Development);

    let (status, _, body) = send_from(&app, CLIENT_ADDR, Method::GET, "/kaboom", None, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "message": "Something went wrong!",
            "error": "Internal error: handler panicked: kaboom"
        })
    );
}

#[tokio::test]
async fn test_panic_detail_hidden_in_production() {
    let app = panicking_app(Environment::Production);

    let (status, _, body) = send_from(&app, CLIENT_ADDR, Method::GET, "/kaboom", None, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Something went wrong!"}));
    assert!(body.get("error").is_none());
}
