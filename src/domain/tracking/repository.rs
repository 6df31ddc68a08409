use crate::domain::errors::DomainResult;
use crate::domain::listing::ListingId;
use crate::domain::tracking::entity::{
    DailyVisits, ListingView, MostViewedListing, NewListingView, NewSiteVisit, RecordOutcome,
    SiteVisit,
};
use crate::domain::tracking::value_objects::{SiteVisitCursor, VisitorSessionId};
use crate::domain::tracking::window::DedupWindow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ListingViewRepository: Send + Sync {
    /// Evaluate `window` against the latest view of the (listing, session)
    /// pair and, when cold, insert `view` and bump the listing's view count.
    ///
    /// Implementations must serialize the whole sequence per pair so that
    /// concurrent callers cannot both observe a cold pair. Fails with
    /// `NotFound` when the listing does not exist.
    async fn record(&self, view: NewListingView, window: DedupWindow)
    -> DomainResult<RecordOutcome>;

    async fn latest_for(
        &self,
        listing_id: ListingId,
        session_id: &VisitorSessionId,
    ) -> DomainResult<Option<ListingView>>;
}

#[async_trait]
pub trait SiteVisitRepository: Send + Sync {
    /// Same contract as [`ListingViewRepository::record`], keyed by
    /// (path, session) and without a counter.
    async fn record(&self, visit: NewSiteVisit, window: DedupWindow) -> DomainResult<RecordOutcome>;

    /// Newest first.
    async fn list_page(
        &self,
        limit: u32,
        cursor: Option<SiteVisitCursor>,
    ) -> DomainResult<(Vec<SiteVisit>, Option<SiteVisitCursor>)>;
}

#[async_trait]
pub trait TrafficStatsRepository: Send + Sync {
    async fn unique_visitors(&self, since: DateTime<Utc>) -> DomainResult<u64>;
    async fn page_views(&self, since: DateTime<Utc>) -> DomainResult<u64>;
    async fn listing_views(&self, since: DateTime<Utc>) -> DomainResult<u64>;
    async fn most_viewed(&self, limit: u32) -> DomainResult<Vec<MostViewedListing>>;
    /// Site visits grouped by UTC calendar day, oldest first.
    async fn daily_visits(&self, since: DateTime<Utc>) -> DomainResult<Vec<DailyVisits>>;
}
