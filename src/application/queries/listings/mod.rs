mod get_by_slug;
mod list;
mod service;
mod view;

pub use get_by_slug::GetListingBySlugQuery;
pub use list::ListListingsQuery;
pub use service::ListingQueryService;
pub use view::{ViewListingQuery, ViewedListing};
