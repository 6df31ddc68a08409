// src/application/commands/tracking/view.rs
use super::{TrackOutcome, VisitTrackingService, service::tracking_error};
use crate::{
    application::error::ApplicationResult,
    domain::{
        listing::ListingId,
        tracking::{NewListingView, RecordOutcome, VisitorSessionId},
    },
};
use tracing::{debug, warn};

pub struct RecordViewCommand {
    pub listing_id: ListingId,
    pub session_id: String,
    /// Stored for analytics only; never part of the dedup key.
    pub ip_address: Option<String>,
    /// Caller opted out of tracking for this request.
    pub suppress: bool,
}

impl VisitTrackingService {
    /// Count a listing view at most once per (listing, session) per window.
    pub async fn record_view(&self, command: RecordViewCommand) -> TrackOutcome {
        if command.suppress {
            return TrackOutcome::Suppressed;
        }

        let listing_id = command.listing_id;
        match self.try_record_view(command).await {
            Ok(RecordOutcome::Recorded) => {
                debug!(%listing_id, "listing view counted");
                TrackOutcome::Counted
            }
            Ok(RecordOutcome::AlreadyRecorded) => TrackOutcome::Deduplicated,
            Err(err) => {
                warn!(%listing_id, error = %err, "failed to record listing view");
                TrackOutcome::Failed
            }
        }
    }

    async fn try_record_view(&self, command: RecordViewCommand) -> ApplicationResult<RecordOutcome> {
        let session_id = VisitorSessionId::new(command.session_id).map_err(tracking_error)?;
        let view = NewListingView {
            listing_id: command.listing_id,
            session_id,
            ip_address: command.ip_address,
            viewed_at: self.clock.now(),
        };

        self.view_repo
            .record(view, self.window)
            .await
            .map_err(tracking_error)
    }
}
