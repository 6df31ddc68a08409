// tests/e2e_http.rs
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::util::ServiceExt as _;

mod support;

use support::{
    ListingBuilder, admin_request, assert_error_response, get, make_test_router, read_json,
    session_cookie,
};

async fn create(app: &axum::Router, payload: Value) -> Value {
    let resp = app
        .clone()
        .oneshot(admin_request("POST", "/api/v1/listings", Some(payload)))
        .await
        .unwrap();
    let (status, _, body) = read_json(resp).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_issues_a_session_cookie() {
    let app = make_test_router();
    let resp = app.oneshot(get("/health")).await.unwrap();
    let (status, headers, body) = read_json(resp).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("visitor_id="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=2592000"));
}

#[tokio::test]
async fn existing_session_cookie_is_reused() {
    let app = make_test_router();
    let resp = app
        .oneshot(get_with_cookie("/health", "visitor_id=returning-visitor-1"))
        .await
        .unwrap();
    let cookie = session_cookie(resp.headers()).unwrap();
    assert_eq!(cookie, "visitor_id=returning-visitor-1");
}

#[tokio::test]
async fn detail_views_are_deduplicated_per_session() {
    let app = make_test_router();
    let created = create(&app, ListingBuilder::new().json()).await;
    let uri = format!("/api/v1/listings/{}", created["slug"].as_str().unwrap());

    let resp = app.clone().oneshot(get(&uri)).await.unwrap();
    let (status, headers, first) = read_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["view_count"], 1);
    let cookie = session_cookie(&headers).unwrap();

    let resp = app
        .clone()
        .oneshot(get_with_cookie(&uri, &cookie))
        .await
        .unwrap();
    let (_, _, again) = read_json(resp).await;
    assert_eq!(again["view_count"], 1);

    // a fresh visitor counts
    let resp = app.clone().oneshot(get(&uri)).await.unwrap();
    let (_, _, other) = read_json(resp).await;
    assert_eq!(other["view_count"], 2);

    let opted_out = Request::builder()
        .method("GET")
        .uri(&uri)
        .header("x-view-tracking", "false")
        .body(Body::empty())
        .unwrap();
    let (_, _, skipped) = read_json(app.oneshot(opted_out).await.unwrap()).await;
    assert_eq!(skipped["view_count"], 2);
}

#[tokio::test]
async fn unknown_slug_is_404() {
    let app = make_test_router();
    let resp = app
        .oneshot(get("/api/v1/listings/does-not-exist"))
        .await
        .unwrap();
    assert_error_response(resp, StatusCode::NOT_FOUND, "Not Found").await;
}

#[tokio::test]
async fn admin_routes_require_the_operator_token() {
    let app = make_test_router();

    let missing = Request::builder()
        .method("POST")
        .uri("/api/v1/listings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(ListingBuilder::new().json().to_string()))
        .unwrap();
    let resp = app.clone().oneshot(missing).await.unwrap();
    assert_error_response(resp, StatusCode::UNAUTHORIZED, "Unauthorized").await;

    let wrong = Request::builder()
        .method("GET")
        .uri("/api/v1/analytics")
        .header(header::AUTHORIZATION, "Bearer not-the-token")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(wrong).await.unwrap();
    assert_error_response(resp, StatusCode::UNAUTHORIZED, "Unauthorized").await;
}

#[tokio::test]
async fn listing_lifecycle() {
    let app = make_test_router();
    let created = create(
        &app,
        ListingBuilder::new().make("Volvo").model("V60").year(2020).json(),
    )
    .await;
    let slug = created["slug"].as_str().unwrap().to_string();
    assert!(slug.starts_with("volvo-v60-2020-"));

    let resp = app
        .clone()
        .oneshot(admin_request(
            "PUT",
            &format!("/api/v1/listings/{slug}"),
            Some(json!({ "price": 21000, "variant": "T6 Recharge" })),
        ))
        .await
        .unwrap();
    let (status, _, updated) = read_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], slug.as_str());
    assert_eq!(updated["price"], 21000);
    assert_eq!(updated["name"], "Volvo V60 T6 Recharge (2020)");

    let resp = app
        .clone()
        .oneshot(admin_request(
            "POST",
            &format!("/api/v1/listings/{slug}/regenerate-slug"),
            None,
        ))
        .await
        .unwrap();
    let (status, _, regenerated) = read_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    let new_slug = regenerated["slug"].as_str().unwrap().to_string();
    assert!(new_slug.starts_with("volvo-v60-t6-recharge-2020-"));

    let resp = app
        .clone()
        .oneshot(get(&format!("/api/v1/listings/{slug}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .clone()
        .oneshot(admin_request(
            "DELETE",
            &format!("/api/v1/listings/{new_slug}"),
            None,
        ))
        .await
        .unwrap();
    let (status, _, body) = read_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");

    let resp = app
        .oneshot(get(&format!("/api/v1/listings/{new_slug}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payload_is_400() {
    let app = make_test_router();
    let resp = app
        .oneshot(admin_request(
            "POST",
            "/api/v1/listings",
            Some(json!({ "make": "Audi", "model": "A4", "price": -5 })),
        ))
        .await
        .unwrap();
    assert_error_response(resp, StatusCode::BAD_REQUEST, "Bad Request").await;
}

#[tokio::test]
async fn catalog_lists_with_page_metadata() {
    let app = make_test_router();
    create(&app, ListingBuilder::new().json()).await;
    create(&app, ListingBuilder::new().make("BMW").model("320d").json()).await;

    let resp = app
        .clone()
        .oneshot(get("/api/v1/listings?make=bmw&page_size=5"))
        .await
        .unwrap();
    let (status, _, body) = read_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["page_size"], 5);
    assert_eq!(body["items"][0]["model"], "320d");

    let resp = app
        .oneshot(get("/api/v1/listings?sort=bogus"))
        .await
        .unwrap();
    assert_error_response(resp, StatusCode::BAD_REQUEST, "Bad Request").await;
}

#[tokio::test]
async fn tagged_reads_show_up_in_analytics() {
    let app = make_test_router();
    create(&app, ListingBuilder::new().json()).await;

    for session in ["visitor_id=sess-one", "visitor_id=sess-two"] {
        let req = Request::builder()
            .method("GET")
            .uri("/api/v1/listings")
            .header(header::COOKIE, session)
            .header("x-requested-for-analytics", "1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.clone().oneshot(req).await.unwrap().status(), StatusCode::OK);
    }
    // untagged API reads and health checks are not site visits
    app.clone().oneshot(get("/api/v1/listings")).await.unwrap();
    app.clone().oneshot(get("/health")).await.unwrap();

    let resp = app
        .clone()
        .oneshot(admin_request("GET", "/api/v1/analytics?days=7", None))
        .await
        .unwrap();
    let (status, _, summary) = read_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["days"], 7);
    assert_eq!(summary["unique_visitors"], 2);
    assert_eq!(summary["total_page_views"], 2);

    let resp = app
        .clone()
        .oneshot(admin_request("GET", "/api/v1/analytics/visits?limit=1", None))
        .await
        .unwrap();
    let (status, _, page) = read_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["has_more"], true);
    let cursor = page["next_cursor"].as_str().unwrap().to_string();

    let resp = app
        .oneshot(admin_request(
            "GET",
            &format!("/api/v1/analytics/visits?limit=1&cursor={cursor}"),
            None,
        ))
        .await
        .unwrap();
    let (_, _, rest) = read_json(resp).await;
    assert_eq!(rest["items"].as_array().unwrap().len(), 1);
    assert_eq!(rest["has_more"], false);
    assert_ne!(rest["items"][0]["id"], page["items"][0]["id"]);
}
