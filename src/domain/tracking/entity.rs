use crate::domain::listing::{Listing, ListingId};
use crate::domain::tracking::value_objects::{VisitPath, VisitorSessionId};
use chrono::{DateTime, NaiveDate, Utc};

/// One counted view of a listing by one visitor session.
#[derive(Debug, Clone)]
pub struct ListingView {
    pub id: i64,
    pub listing_id: ListingId,
    pub session_id: VisitorSessionId,
    pub ip_address: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewListingView {
    pub listing_id: ListingId,
    pub session_id: VisitorSessionId,
    pub ip_address: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SiteVisit {
    pub id: i64,
    pub path: VisitPath,
    pub session_id: VisitorSessionId,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub visited_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSiteVisit {
    pub path: VisitPath,
    pub session_id: VisitorSessionId,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub visited_at: DateTime<Utc>,
}

/// Result of the guarded check-then-insert sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The pair was cold: the event was stored (and the counter bumped).
    Recorded,
    /// The pair was warm: nothing was written.
    AlreadyRecorded,
}

#[derive(Debug, Clone)]
pub struct MostViewedListing {
    pub listing_id: ListingId,
    pub name: String,
    pub slug: String,
    pub views: i64,
}

impl From<&Listing> for MostViewedListing {
    fn from(listing: &Listing) -> Self {
        Self {
            listing_id: listing.id,
            name: listing.display_name(),
            slug: listing.slug.as_str().to_string(),
            views: listing.view_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyVisits {
    pub date: NaiveDate,
    pub views: u64,
}
