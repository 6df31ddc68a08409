// src/application/commands/tracking/service.rs
use std::sync::Arc;

use crate::{
    application::{error::ApplicationError, ports::time::Clock},
    domain::errors::DomainError,
    domain::tracking::{DedupWindow, ListingViewRepository, SiteVisitPolicy, SiteVisitRepository},
};

/// What happened to a tracking request. Tracking never fails the caller, so
/// errors are folded into `Failed` after being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    Counted,
    Deduplicated,
    Suppressed,
    Failed,
}

pub struct VisitTrackingService {
    pub(super) view_repo: Arc<dyn ListingViewRepository>,
    pub(super) visit_repo: Arc<dyn SiteVisitRepository>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) window: DedupWindow,
    pub(super) policy: SiteVisitPolicy,
}

impl VisitTrackingService {
    pub fn new(
        view_repo: Arc<dyn ListingViewRepository>,
        visit_repo: Arc<dyn SiteVisitRepository>,
        clock: Arc<dyn Clock>,
        window: DedupWindow,
        policy: SiteVisitPolicy,
    ) -> Self {
        Self {
            view_repo,
            visit_repo,
            clock,
            window,
            policy,
        }
    }
}

pub(super) fn tracking_error(err: DomainError) -> ApplicationError {
    ApplicationError::tracking(err.to_string())
}
