// src/domain/mod.rs
pub mod errors;
pub mod listing;
pub mod tracking;
