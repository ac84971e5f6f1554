//! Shared helpers for the HTTP integration tests
//!
//! Every test builds a fresh router over an in-memory store and drives it
//! with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

pub mod database;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use homeshare::backend::routes::create_router;
use homeshare::backend::server::{AppState, Config, Environment, RateLimit};
use homeshare::backend::store::MemoryStore;

pub const PASSWORD: &str = "password123";

/// A test server over an empty in-memory store
pub fn test_app() -> Router {
    test_app_in(Environment::Test)
}

pub fn test_app_in(environment: Environment) -> Router {
    test_app_with(Config {
        environment,
        ..Config::default()
    })
}

/// A test server whose clients may send `max_requests` requests each
pub fn test_app_limited(max_requests: u32) -> Router {
    test_app_with(Config {
        environment: Environment::Test,
        rate_limit: RateLimit {
            max_requests,
            ..RateLimit::default()
        },
        ..Config::default()
    })
}

pub fn test_app_with(config: Config) -> Router {
    create_router(AppState::new(Arc::new(MemoryStore::new()), config))
}

/// Peer address attached to requests that do not pick their own
pub const CLIENT_ADDR: &str = "203.0.113.7:40000";

/// A registered user and their bearer token
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// Send one request and return the status and JSON body (`Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, body) = send_from(app, CLIENT_ADDR, method, uri, token, body).await;
    (status, body)
}

/// Send one request from `client` and return the status, headers and body
pub async fn send_from(
    app: &Router,
    client: &str,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let client: SocketAddr = client.parse().unwrap();
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(client));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, auth_header(token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, headers, body)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn patch(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, token, None).await
}

/// A registration payload that passes validation
pub fn registration(email: &str, role: &str) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "firstName": "Test",
        "lastName": "User",
        "role": role,
        "dateOfBirth": "1950-04-12",
        "phoneNumber": "555-0100",
        "location": {
            "address": "1 Main St",
            "city": "Portland",
            "state": "OR",
            "zipCode": "97201"
        },
        "preferences": {
            "ageRange": { "min": 18, "max": 99 },
            "maxRent": 1200
        }
    })
}

/// Register a user and return their id and token
pub async fn register_user(app: &Router, email: &str, role: &str) -> TestUser {
    let (status, body) = post(app, "/api/auth/register", None, registration(email, role)).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
    TestUser {
        id: body["user"]["_id"].as_str().unwrap().to_string(),
        email: body["user"]["email"].as_str().unwrap().to_string(),
        token: body["token"].as_str().unwrap().to_string(),
    }
}

/// A listing payload that passes validation
pub fn listing(title: &str, city: &str, price: f64) -> Value {
    json!({
        "title": title,
        "description": "Sunny room in a quiet house near the park",
        "type": "room",
        "price": price,
        "location": {
            "address": "22 Elm St",
            "city": city,
            "state": "OR",
            "zipCode": "97202"
        },
        "amenities": ["wifi"],
        "availability": { "startDate": "2026-11-01" },
        "requirements": { "minAge": 21, "maxAge": 80 }
    })
}

/// Create a listing as `owner` and return its id
pub async fn create_listing(app: &Router, owner: &TestUser, body: Value) -> String {
    let (status, body) = post(app, "/api/listings", Some(&owner.token), body).await;
    assert_eq!(status, StatusCode::CREATED, "listing creation failed: {body}");
    body["listing"]["_id"].as_str().unwrap().to_string()
}
