pub mod entity;
pub mod repository;
pub mod specifications;
pub mod value_objects;
pub mod window;

pub use entity::{
    DailyVisits, ListingView, MostViewedListing, NewListingView, NewSiteVisit, RecordOutcome,
    SiteVisit,
};
pub use repository::{ListingViewRepository, SiteVisitRepository, TrafficStatsRepository};
pub use specifications::{SiteVisitPolicy, TrackableVisitSpec};
pub use value_objects::{SiteVisitCursor, VisitPath, VisitorSessionId};
pub use window::{DedupWindow, PairState};
