use super::ListingQueryService;
use crate::application::{
    commands::tracking::{RecordViewCommand, TrackOutcome},
    dto::ListingDto,
    error::ApplicationResult,
};

pub struct ViewListingQuery {
    pub slug: String,
    pub session_id: String,
    pub ip_address: Option<String>,
    pub suppress_tracking: bool,
}

#[derive(Debug)]
pub struct ViewedListing {
    pub listing: ListingDto,
    pub outcome: TrackOutcome,
}

impl ListingQueryService {
    /// Detail lookup that also records a deduplicated view. Tracking problems
    /// never fail the lookup.
    pub async fn view_listing(&self, query: ViewListingQuery) -> ApplicationResult<ViewedListing> {
        let mut listing = self.find_by_slug(&query.slug).await?;

        let outcome = self
            .tracking
            .record_view(RecordViewCommand {
                listing_id: listing.id,
                session_id: query.session_id,
                ip_address: query.ip_address,
                suppress: query.suppress_tracking,
            })
            .await;

        if outcome == TrackOutcome::Counted {
            listing.view_count += 1;
        }

        Ok(ViewedListing {
            listing: listing.into(),
            outcome,
        })
    }
}
