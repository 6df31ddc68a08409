pub mod analytics;
pub mod listings;
