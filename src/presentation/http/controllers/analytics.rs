// src/presentation/http/controllers/analytics.rs
use crate::application::{
    dto::AnalyticsSummaryDto,
    queries::analytics::{AnalyticsSummaryQuery, ListSiteVisitsQuery},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::openapi::SiteVisitListResponse;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Query};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsParams {
    /// Look-back window in days (1..=365, default 30).
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SiteVisitListParams {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics",
    params(AnalyticsParams),
    responses(
        (status = 200, description = "Traffic summary.", body = AnalyticsSummaryDto),
        (status = 400, description = "Invalid range.", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Unauthorized.", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Forbidden.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Analytics"
)]
pub async fn summary(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<AnalyticsParams>,
) -> HttpResult<Json<AnalyticsSummaryDto>> {
    state
        .services
        .analytics_queries
        .summary(&user, AnalyticsSummaryQuery { days: params.days })
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/visits",
    params(SiteVisitListParams),
    responses(
        (status = 200, description = "Site visits, newest first.", body = SiteVisitListResponse),
        (status = 400, description = "Invalid cursor.", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Unauthorized.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Analytics"
)]
pub async fn list_site_visits(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Query(params): Query<SiteVisitListParams>,
) -> HttpResult<Json<SiteVisitListResponse>> {
    let query = ListSiteVisitsQuery {
        limit: params.limit,
        cursor: params.cursor,
    };

    state
        .services
        .analytics_queries
        .list_site_visits(&user, query)
        .await
        .into_http()
        .map(|page| Json(page.into()))
}
