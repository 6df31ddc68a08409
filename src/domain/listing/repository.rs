use crate::domain::errors::DomainResult;
use crate::domain::listing::entity::{Listing, ListingUpdate, NewListing};
use crate::domain::listing::value_objects::{ListingId, ListingSlug};
use async_trait::async_trait;

/// Catalog filters. Text filters match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub make: Option<String>,
    pub model: Option<String>,
    pub registration_year: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub max_mileage: Option<i64>,
    pub search: Option<String>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        fn eq_ci(a: &str, b: &str) -> bool {
            a.eq_ignore_ascii_case(b.trim())
        }

        if let Some(make) = &self.make {
            if !eq_ci(listing.make.as_str(), make) {
                return false;
            }
        }
        if let Some(model) = &self.model {
            if !eq_ci(listing.model.as_str(), model) {
                return false;
            }
        }
        if let Some(year) = self.registration_year {
            if listing.registration_year.map(|y| y.value()) != Some(year) {
                return false;
            }
        }
        let price = listing.price.map(|p| p.value());
        if let Some(min) = self.min_price {
            if price.is_none_or(|p| p < min) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if price.is_none_or(|p| p > max) {
                return false;
            }
        }
        if let Some(max) = self.max_mileage {
            if listing.mileage.is_none_or(|m| m.value() > max) {
                return false;
            }
        }
        if let Some(query) = self.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = query.to_lowercase();
            let haystacks = [
                listing.make.as_str(),
                listing.model.as_str(),
                listing.description.as_str(),
            ];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&needle)) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingSort {
    PriceAsc,
    PriceDesc,
    YearAsc,
    YearDesc,
    MileageAsc,
    MileageDesc,
    #[default]
    CreatedDesc,
    ViewsDesc,
}

impl ListingSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            "year_asc" => Some(Self::YearAsc),
            "year_desc" => Some(Self::YearDesc),
            "mileage_asc" => Some(Self::MileageAsc),
            "mileage_desc" => Some(Self::MileageDesc),
            "created_desc" => Some(Self::CreatedDesc),
            "views_desc" => Some(Self::ViewsDesc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

#[async_trait]
pub trait ListingWriteRepository: Send + Sync {
    /// Fails with `DuplicateSlug` when the slug is already persisted.
    async fn insert(&self, listing: NewListing) -> DomainResult<Listing>;
    /// Fails with `Conflict` when `original_updated_at` no longer matches and
    /// with `DuplicateSlug` when a new slug collides.
    async fn update(&self, update: ListingUpdate) -> DomainResult<Listing>;
    /// Removes the listing together with its view events.
    async fn delete(&self, id: ListingId) -> DomainResult<()>;
}

#[async_trait]
pub trait ListingReadRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &ListingSlug) -> DomainResult<Option<Listing>>;

    async fn slug_exists(&self, slug: &ListingSlug) -> DomainResult<bool> {
        Ok(self.find_by_slug(slug).await?.is_some())
    }

    async fn list_page(
        &self,
        filter: &ListingFilter,
        sort: ListingSort,
        page: PageRequest,
    ) -> DomainResult<(Vec<Listing>, u64)>;
}
