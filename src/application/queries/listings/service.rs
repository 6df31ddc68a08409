use std::sync::Arc;

use crate::{
    application::{
        commands::tracking::VisitTrackingService,
        error::{ApplicationError, ApplicationResult},
    },
    domain::listing::{Listing, ListingReadRepository, ListingSlug},
};

pub struct ListingQueryService {
    pub(super) read_repo: Arc<dyn ListingReadRepository>,
    pub(super) tracking: Arc<VisitTrackingService>,
}

impl ListingQueryService {
    pub fn new(
        read_repo: Arc<dyn ListingReadRepository>,
        tracking: Arc<VisitTrackingService>,
    ) -> Self {
        Self {
            read_repo,
            tracking,
        }
    }

    pub(super) async fn find_by_slug(&self, slug: &str) -> ApplicationResult<Listing> {
        // a malformed slug cannot name any listing
        let slug = ListingSlug::new(slug)
            .map_err(|_| ApplicationError::not_found("listing not found"))?;
        self.read_repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("listing not found"))
    }
}
