// src/presentation/http/openapi.rs
use crate::application::dto::{CursorPage, ListingDto, NumberedPage, SiteVisitDto};
use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, env, fs::File, io::BufWriter, path::Path};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
    server::Server,
};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingListResponse {
    pub items: Vec<ListingDto>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SiteVisitListResponse {
    pub items: Vec<SiteVisitDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::listings::list_listings,
        crate::presentation::http::controllers::listings::get_listing,
        crate::presentation::http::controllers::listings::create_listing,
        crate::presentation::http::controllers::listings::update_listing,
        crate::presentation::http::controllers::listings::regenerate_slug,
        crate::presentation::http::controllers::listings::delete_listing,
        crate::presentation::http::controllers::analytics::summary,
        crate::presentation::http::controllers::analytics::list_site_visits,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            ListingListResponse,
            SiteVisitListResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::listings::CreateListingRequest,
            crate::presentation::http::controllers::listings::UpdateListingRequest,
            crate::application::dto::ListingDto,
            crate::application::dto::AnalyticsSummaryDto,
            crate::application::dto::MostViewedDto,
            crate::application::dto::DailyVisitsDto,
            crate::application::dto::SiteVisitDto
        )
    ),
    tags(
        (name = "Listings", description = "Vehicle listing catalog and inventory management"),
        (name = "Analytics", description = "Visit and view statistics"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    info(
        title = "Dealership API",
        description = "Car dealership listing backend",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );

        let servers = openapi.servers.get_or_insert_with(Vec::new);
        servers.clear();

        let mut urls: Vec<String> = env::var("PUBLIC_API_URLS")
            .ok()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| segment.trim_end_matches('/').to_string())
                    .collect()
            })
            .unwrap_or_default();

        if urls.is_empty() {
            urls.push("http://localhost:8080".to_string());
        }

        let mut seen = HashSet::new();
        for url in urls {
            if seen.insert(url.clone()) {
                servers.push(Server::new(url));
            }
        }
    }
}

pub async fn serve_openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}

pub fn docs_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(serve_openapi))
}

pub fn write_openapi_snapshot() -> std::io::Result<()> {
    let spec = ApiDoc::openapi();
    let output_path =
        env::var("OPENAPI_SNAPSHOT_PATH").unwrap_or_else(|_| "spec/openapi.json".to_string());
    let path = Path::new(&output_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &spec)?;
    Ok(())
}

impl From<NumberedPage<ListingDto>> for ListingListResponse {
    fn from(page: NumberedPage<ListingDto>) -> Self {
        Self {
            items: page.items,
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}

impl From<CursorPage<SiteVisitDto>> for SiteVisitListResponse {
    fn from(page: CursorPage<SiteVisitDto>) -> Self {
        Self {
            items: page.items,
            next_cursor: page.next_cursor,
            has_more: page.has_more,
        }
    }
}
