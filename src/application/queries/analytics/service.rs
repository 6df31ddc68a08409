use std::sync::Arc;

use crate::{
    application::{
        dto::AuthenticatedUser,
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::tracking::{SiteVisitRepository, TrafficStatsRepository},
};

pub struct AnalyticsQueryService {
    pub(super) stats_repo: Arc<dyn TrafficStatsRepository>,
    pub(super) visit_repo: Arc<dyn SiteVisitRepository>,
    pub(super) clock: Arc<dyn Clock>,
}

impl AnalyticsQueryService {
    pub fn new(
        stats_repo: Arc<dyn TrafficStatsRepository>,
        visit_repo: Arc<dyn SiteVisitRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            stats_repo,
            visit_repo,
            clock,
        }
    }

    pub(super) fn ensure_can_read(&self, actor: &AuthenticatedUser) -> ApplicationResult<()> {
        if actor.has_capability("analytics", "read") {
            Ok(())
        } else {
            Err(ApplicationError::forbidden(
                "missing capability analytics:read",
            ))
        }
    }
}
