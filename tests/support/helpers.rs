// tests/support/helpers.rs
use super::mocks::{ManualClock, fixed_now};
use axum::body::{self, Body};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::Response;
use dealership_core::application::{
    dto::AuthenticatedUser,
    ports::{security::TokenManager, time::Clock, util::SlugGenerator},
    services::{ApplicationServices, ServiceSettings},
};
use dealership_core::domain::tracking::ListingViewRepository;
use dealership_core::infrastructure::{
    repositories::InMemoryStore, security::token::StaticTokenManager, time::SystemClock,
    util::DefaultSlugGenerator,
};
use dealership_core::presentation::http::{
    routes::build_router_with_rate_limiter,
    state::{HttpState, SessionCookieSettings},
};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

pub const ADMIN_TOKEN: &str = "test-admin-token-0123456789";

pub struct TestServices {
    pub services: Arc<ApplicationServices>,
    pub store: InMemoryStore,
    pub clock: Arc<ManualClock>,
}

pub fn build_services(slugger: Arc<dyn SlugGenerator>, settings: ServiceSettings) -> TestServices {
    let store = InMemoryStore::new();
    build_services_with_views(slugger, settings, Arc::new(store.clone()), store)
}

/// Same as [`build_services`] but with a custom view store.
pub fn build_services_with_views(
    slugger: Arc<dyn SlugGenerator>,
    settings: ServiceSettings,
    views: Arc<dyn ListingViewRepository>,
    store: InMemoryStore,
) -> TestServices {
    let clock = Arc::new(ManualClock::new());
    let clock_port: Arc<dyn Clock> = clock.clone();
    let token_manager: Arc<dyn TokenManager> =
        Arc::new(StaticTokenManager::new(ADMIN_TOKEN, Arc::clone(&clock_port)));

    let services = Arc::new(ApplicationServices::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        views,
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        token_manager,
        clock_port,
        slugger,
        settings,
    ));

    TestServices {
        services,
        store,
        clock,
    }
}

pub fn admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        subject: "admin".into(),
        capabilities: StaticTokenManager::admin_capabilities(),
        authenticated_at: fixed_now(),
    }
}

pub fn powerless_user() -> AuthenticatedUser {
    AuthenticatedUser {
        subject: "guest".into(),
        capabilities: HashSet::new(),
        authenticated_at: fixed_now(),
    }
}

pub fn build_test_state() -> HttpState {
    let store = InMemoryStore::new();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let token_manager: Arc<dyn TokenManager> =
        Arc::new(StaticTokenManager::new(ADMIN_TOKEN, Arc::clone(&clock)));

    let services = Arc::new(ApplicationServices::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store),
        token_manager,
        clock,
        Arc::new(DefaultSlugGenerator),
        ServiceSettings::default(),
    ));

    HttpState::new(services, SessionCookieSettings::default())
}

pub fn make_test_router() -> axum::Router {
    build_router_with_rate_limiter(build_test_state(), false)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn admin_request(method: &str, uri: &str, json: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"));
    match json {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(resp: Response) -> (StatusCode, HeaderMap, Value) {
    let status = resp.status();
    let (parts, body_stream) = resp.into_parts();
    let bytes = body::to_bytes(body_stream, 1024 * 1024)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "expected json body, got: {}",
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    (status, parts.headers, json)
}

/// `visitor_id=<value>` pair from the response's Set-Cookie header.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("visitor_id="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

/// Assert that a response is an ErrorResponse JSON with the expected status and error string.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    let (parts, body_stream) = resp.into_parts();
    let body_bytes = body::to_bytes(body_stream, 1024 * 1024)
        .await
        .expect("read body");
    let ct = parts
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(ct.starts_with("application/json"), "unexpected content-type: {}", ct);
    let json: Value =
        serde_json::from_slice(&body_bytes).expect("expected valid json body for error");
    let err_field = json.get("error").and_then(|v| v.as_str()).unwrap_or("");
    let msg_field = json.get("message").and_then(|v| v.as_str()).unwrap_or("");
    assert_eq!(err_field, expected_error, "unexpected error field: {}", err_field);
    assert!(!msg_field.is_empty(), "expected non-empty message field in ErrorResponse");
}
