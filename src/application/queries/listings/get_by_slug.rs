use super::ListingQueryService;
use crate::application::{dto::ListingDto, error::ApplicationResult};

pub struct GetListingBySlugQuery {
    pub slug: String,
}

impl ListingQueryService {
    /// Plain lookup without tracking.
    pub async fn get_listing_by_slug(
        &self,
        query: GetListingBySlugQuery,
    ) -> ApplicationResult<ListingDto> {
        let listing = self.find_by_slug(&query.slug).await?;
        Ok(listing.into())
    }
}
