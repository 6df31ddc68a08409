// src/presentation/http/controllers/listings.rs
use crate::application::{
    commands::listings::{
        CreateListingCommand, DeleteListingCommand, RegenerateSlugCommand, UpdateListingCommand,
    },
    dto::ListingDto,
    queries::listings::{ListListingsQuery, ViewListingQuery},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{Authenticated, VisitorContext};
use crate::presentation::http::openapi::{ListingListResponse, StatusResponse};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListingListParams {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub max_mileage: Option<i64>,
    /// Free-text search over make, model and description.
    pub q: Option<String>,
    /// One of `price_asc`, `price_desc`, `year_asc`, `year_desc`,
    /// `mileage_asc`, `mileage_desc`, `created_desc`, `views_desc`.
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub registration_year: Option<i32>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub mileage: Option<i64>,
    #[serde(default)]
    pub description: String,
}

/// Absent fields are left unchanged; an explicit `null` clears a nullable one.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateListingRequest {
    pub make: Option<String>,
    pub model: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub variant: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<i32>)]
    pub registration_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<i64>)]
    pub price: Option<Option<i64>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<i64>)]
    pub mileage: Option<Option<i64>>,
    pub description: Option<String>,
}

fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[utoipa::path(
    get,
    path = "/api/v1/listings",
    params(ListingListParams),
    responses(
        (status = 200, description = "Page of listings.", body = ListingListResponse),
        (status = 400, description = "Invalid filter or sort key.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security([]),
    tag = "Listings"
)]
pub async fn list_listings(
    Extension(state): Extension<HttpState>,
    Query(params): Query<ListingListParams>,
) -> HttpResult<Json<ListingListResponse>> {
    let query = ListListingsQuery {
        make: params.make,
        model: params.model,
        year: params.year,
        min_price: params.min_price,
        max_price: params.max_price,
        max_mileage: params.max_mileage,
        search: params.q,
        sort: params.sort,
        page: params.page,
        page_size: params.page_size,
    };

    state
        .services
        .listing_queries
        .list_listings(query)
        .await
        .into_http()
        .map(|page| Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/listings/{slug}",
    params(
        ("slug" = String, Path, description = "Listing slug"),
        ("X-View-Tracking" = Option<String>, Header, description = "Send `false` to skip view counting")
    ),
    responses(
        (status = 200, description = "Listing detail.", body = crate::application::dto::ListingDto),
        (status = 404, description = "Unknown slug.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security([]),
    tag = "Listings"
)]
pub async fn get_listing(
    Extension(state): Extension<HttpState>,
    visitor: VisitorContext,
    Path(slug): Path<String>,
) -> HttpResult<Json<ListingDto>> {
    let query = ViewListingQuery {
        slug,
        session_id: visitor.session_id,
        ip_address: visitor.ip_address,
        suppress_tracking: visitor.tracking_opt_out,
    };

    state
        .services
        .listing_queries
        .view_listing(query)
        .await
        .into_http()
        .map(|viewed| Json(viewed.listing))
}

#[utoipa::path(
    post,
    path = "/api/v1/listings",
    request_body = CreateListingRequest,
    responses(
        (status = 201, description = "Listing created.", body = crate::application::dto::ListingDto),
        (status = 400, description = "Validation failed.", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Unauthorized.", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "No unique slug could be assigned.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Listings"
)]
pub async fn create_listing(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<CreateListingRequest>,
) -> HttpResult<(StatusCode, Json<ListingDto>)> {
    let command = CreateListingCommand {
        make: payload.make,
        model: payload.model,
        variant: payload.variant,
        registration_year: payload.registration_year,
        price: payload.price,
        mileage: payload.mileage,
        description: payload.description,
    };

    state
        .services
        .listing_commands
        .create_listing(&user, command)
        .await
        .into_http()
        .map(|dto| (StatusCode::CREATED, Json(dto)))
}

#[utoipa::path(
    put,
    path = "/api/v1/listings/{slug}",
    params(("slug" = String, Path, description = "Listing slug")),
    request_body = UpdateListingRequest,
    responses(
        (status = 200, description = "Listing updated; the slug is unchanged.", body = crate::application::dto::ListingDto),
        (status = 400, description = "Validation failed.", body = crate::presentation::http::error::ErrorResponse),
        (status = 401, description = "Unauthorized.", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Unknown slug.", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "Concurrent modification.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Listings"
)]
pub async fn update_listing(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateListingRequest>,
) -> HttpResult<Json<ListingDto>> {
    let command = UpdateListingCommand {
        slug,
        make: payload.make,
        model: payload.model,
        variant: payload.variant,
        registration_year: payload.registration_year,
        price: payload.price,
        mileage: payload.mileage,
        description: payload.description,
    };

    state
        .services
        .listing_commands
        .update_listing(&user, command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/listings/{slug}/regenerate-slug",
    params(("slug" = String, Path, description = "Current listing slug")),
    responses(
        (status = 200, description = "Listing with its new slug.", body = crate::application::dto::ListingDto),
        (status = 401, description = "Unauthorized.", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Unknown slug.", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "No unique slug could be assigned.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Listings"
)]
pub async fn regenerate_slug(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
) -> HttpResult<Json<ListingDto>> {
    state
        .services
        .listing_commands
        .regenerate_slug(&user, RegenerateSlugCommand { slug })
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/listings/{slug}",
    params(("slug" = String, Path, description = "Listing slug")),
    responses(
        (status = 200, description = "Listing and its view history deleted.", body = StatusResponse),
        (status = 401, description = "Unauthorized.", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Unknown slug.", body = crate::presentation::http::error::ErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Listings"
)]
pub async fn delete_listing(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
) -> HttpResult<Json<StatusResponse>> {
    state
        .services
        .listing_commands
        .delete_listing(&user, DeleteListingCommand { slug })
        .await
        .into_http()?;

    Ok(Json(StatusResponse {
        status: "deleted".into(),
    }))
}
