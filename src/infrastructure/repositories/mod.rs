// src/infrastructure/repositories/mod.rs
mod error;
mod memory;
mod postgres_listing;
mod postgres_tracking;

pub use error::map_sqlx;
pub use memory::InMemoryStore;
pub use postgres_listing::{PostgresListingReadRepository, PostgresListingWriteRepository};
pub use postgres_tracking::{
    PostgresListingViewRepository, PostgresSiteVisitRepository, PostgresTrafficStatsRepository,
};
