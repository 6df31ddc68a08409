use crate::domain::listing::Listing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListingDto {
    pub id: i64,
    pub name: String,
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
    pub description: String,
    pub slug: String,
    pub view_count: i64,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for ListingDto {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id.into(),
            name: listing.display_name(),
            make: listing.make.into_inner(),
            model: listing.model.into_inner(),
            variant: listing.variant.map(|v| v.into_inner()),
            registration_year: listing.registration_year.map(|y| y.value()),
            price: listing.price.map(|p| p.value()),
            mileage: listing.mileage.map(|m| m.value()),
            description: listing.description,
            slug: listing.slug.into_inner(),
            view_count: listing.view_count,
            created_at: listing.created_at,
            updated_at: listing.updated_at,
        }
    }
}
