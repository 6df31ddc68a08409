// tests/support/mocks/repos.rs
use async_trait::async_trait;
use dealership_core::domain::errors::{DomainError, DomainResult};
use dealership_core::domain::listing::ListingId;
use dealership_core::domain::tracking::{
    DedupWindow, ListingView, ListingViewRepository, NewListingView, RecordOutcome,
    VisitorSessionId,
};

/// View store whose backend is always down.
#[derive(Clone, Default)]
pub struct FailingViewRepo;

#[async_trait]
impl ListingViewRepository for FailingViewRepo {
    async fn record(
        &self,
        _view: NewListingView,
        _window: DedupWindow,
    ) -> DomainResult<RecordOutcome> {
        Err(DomainError::Persistence("connection refused".into()))
    }

    async fn latest_for(
        &self,
        _listing_id: ListingId,
        _session_id: &VisitorSessionId,
    ) -> DomainResult<Option<ListingView>> {
        Err(DomainError::Persistence("connection refused".into()))
    }
}
