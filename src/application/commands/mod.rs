pub mod listings;
pub mod tracking;
