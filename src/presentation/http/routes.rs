// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{analytics, listings},
    middleware::{
        rate_limit::{RateLimitSettings, admin_rate_limit_layer},
        site_visit::track_site_visit,
        visitor_session::visitor_session,
    },
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::{HeaderName, HeaderValue, Method, header},
    middleware::from_fn,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

pub fn build_router_with_rate_limiter(state: HttpState, rate_limit: bool) -> Router {
    let settings = rate_limit.then(RateLimitSettings::default);
    build_router_with_options(state, settings, &[])
}

/// `allowed_origins` empty means any origin; `rate_limit` of `None` leaves
/// the operator endpoints unthrottled.
pub fn build_router_with_options(
    state: HttpState,
    rate_limit: Option<RateLimitSettings>,
    allowed_origins: &[String],
) -> Router {
    let public = Router::new()
        .route("/api/v1/listings", get(listings::list_listings))
        .route("/api/v1/listings/{slug}", get(listings::get_listing));

    let mut admin = Router::new()
        .route("/api/v1/listings", post(listings::create_listing))
        .route(
            "/api/v1/listings/{slug}",
            axum::routing::put(listings::update_listing).delete(listings::delete_listing),
        )
        .route(
            "/api/v1/listings/{slug}/regenerate-slug",
            post(listings::regenerate_slug),
        )
        .route("/api/v1/analytics", get(analytics::summary))
        .route("/api/v1/analytics/visits", get(analytics::list_site_visits));
    if let Some(settings) = rate_limit {
        match admin_rate_limit_layer(settings) {
            Some(layer) => admin = admin.layer(layer),
            None => warn!(?settings, "rate limit settings rejected; operator routes unthrottled"),
        }
    }

    let tracked = public.merge(admin).layer(from_fn(track_site_visit));

    Router::new()
        .merge(tracked)
        .merge(openapi::docs_router())
        .route("/health", get(health))
        .layer(from_fn(visitor_session))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .layer(Extension(state))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(3600));

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        base.allow_origin(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    } else {
        // the session cookie only travels with credentialed requests
        base.allow_origin(origins)
            .allow_credentials(true)
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static("x-view-tracking"),
                HeaderName::from_static("x-requested-for-analytics"),
            ])
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    security([]),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
