// src/presentation/http/middleware/mod.rs
pub mod rate_limit;
pub mod site_visit;
pub mod visitor_session;
