// src/application/commands/listings/service.rs
use std::sync::Arc;

use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::listing::{
        Listing, ListingReadRepository, ListingSlug, ListingWriteRepository,
        services::{ListingSlugService, SlugSource},
    },
};

pub struct ListingCommandService {
    pub(super) write_repo: Arc<dyn ListingWriteRepository>,
    pub(super) read_repo: Arc<dyn ListingReadRepository>,
    pub(super) slug_service: Arc<ListingSlugService>,
    pub(super) clock: Arc<dyn Clock>,
}

impl ListingCommandService {
    pub fn new(
        write_repo: Arc<dyn ListingWriteRepository>,
        read_repo: Arc<dyn ListingReadRepository>,
        slug_service: Arc<ListingSlugService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            write_repo,
            read_repo,
            slug_service,
            clock,
        }
    }

    pub(super) async fn load_by_slug(&self, slug: &str) -> ApplicationResult<Listing> {
        let slug = ListingSlug::new(slug)
            .map_err(|_| ApplicationError::not_found("listing not found"))?;
        self.read_repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("listing not found"))
    }

    pub(super) fn persist_attempts(&self) -> u32 {
        self.slug_service.policy().persist_attempts.max(1)
    }
}

pub(super) fn slug_source(listing: &Listing) -> SlugSource<'_> {
    SlugSource {
        make: Some(listing.make.as_str()),
        model: Some(listing.model.as_str()),
        variant: listing.variant.as_ref().map(|v| v.as_str()),
        registration_year: listing.registration_year.map(|y| y.value()),
    }
}
