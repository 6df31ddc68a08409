// src/application/commands/tracking/site_visit.rs
use super::{TrackOutcome, VisitTrackingService, service::tracking_error};
use crate::{
    application::error::ApplicationResult,
    domain::tracking::{
        NewSiteVisit, RecordOutcome, TrackableVisitSpec, VisitPath, VisitorSessionId,
    },
};
use tracing::{debug, warn};

pub struct RecordSiteVisitCommand {
    pub path: String,
    pub session_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    /// `GET`/`HEAD` request.
    pub is_read: bool,
    /// The request carried `X-Requested-For-Analytics`.
    pub analytics_tagged: bool,
}

impl VisitTrackingService {
    /// Count a page visit at most once per (path, session) per window.
    /// Asset paths and untagged API calls are ignored.
    pub async fn record_site_visit(&self, command: RecordSiteVisitCommand) -> TrackOutcome {
        let trackable = TrackableVisitSpec::new(
            &self.policy,
            &command.path,
            command.is_read,
            command.analytics_tagged,
        )
        .is_satisfied();
        if !trackable {
            return TrackOutcome::Suppressed;
        }

        let path = command.path.clone();
        match self.try_record_site_visit(command).await {
            Ok(RecordOutcome::Recorded) => {
                debug!(%path, "site visit counted");
                TrackOutcome::Counted
            }
            Ok(RecordOutcome::AlreadyRecorded) => TrackOutcome::Deduplicated,
            Err(err) => {
                warn!(%path, error = %err, "failed to record site visit");
                TrackOutcome::Failed
            }
        }
    }

    async fn try_record_site_visit(
        &self,
        command: RecordSiteVisitCommand,
    ) -> ApplicationResult<RecordOutcome> {
        let visit = NewSiteVisit {
            path: VisitPath::new(command.path).map_err(tracking_error)?,
            session_id: VisitorSessionId::new(command.session_id).map_err(tracking_error)?,
            ip_address: command.ip_address,
            user_agent: command.user_agent,
            referrer: command.referrer,
            visited_at: self.clock.now(),
        };

        self.visit_repo
            .record(visit, self.window)
            .await
            .map_err(tracking_error)
    }
}
