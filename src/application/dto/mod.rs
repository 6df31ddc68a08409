pub mod analytics;
pub mod auth;
pub mod listings;
pub mod pagination;
pub mod serde_time;

pub use analytics::{AnalyticsSummaryDto, DailyVisitsDto, MostViewedDto, SiteVisitDto};
pub use auth::{AuthenticatedUser, Capability};
pub use listings::ListingDto;
pub use pagination::{CursorPage, NumberedPage};
