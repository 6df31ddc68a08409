// src/presentation/http/controllers/mod.rs
pub mod analytics;
pub mod listings;
