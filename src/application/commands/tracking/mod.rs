// src/application/commands/tracking/mod.rs
mod service;
mod site_visit;
mod view;

pub use service::{TrackOutcome, VisitTrackingService};
pub use site_visit::RecordSiteVisitCommand;
pub use view::RecordViewCommand;
