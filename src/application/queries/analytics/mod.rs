mod service;
mod summary;
mod visits;

pub use service::AnalyticsQueryService;
pub use summary::AnalyticsSummaryQuery;
pub use visits::ListSiteVisitsQuery;
