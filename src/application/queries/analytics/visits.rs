use super::AnalyticsQueryService;
use crate::{
    application::{
        dto::{AuthenticatedUser, CursorPage, SiteVisitDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{errors::DomainError, tracking::SiteVisitCursor},
};

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 200;

pub struct ListSiteVisitsQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl AnalyticsQueryService {
    /// Site visit log, newest first.
    pub async fn list_site_visits(
        &self,
        actor: &AuthenticatedUser,
        query: ListSiteVisitsQuery,
    ) -> ApplicationResult<CursorPage<SiteVisitDto>> {
        self.ensure_can_read(actor)?;

        let limit = match query.limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(limit) => limit.min(MAX_LIMIT),
        };
        let cursor = match query.cursor.as_deref() {
            Some(token) => match SiteVisitCursor::decode(token) {
                Ok(cursor) => Some(cursor),
                Err(DomainError::Validation(msg)) => return Err(ApplicationError::validation(msg)),
                Err(other) => return Err(other.into()),
            },
            None => None,
        };

        let (records, next_cursor) = self.visit_repo.list_page(limit, cursor).await?;
        let items = records.into_iter().map(Into::into).collect();
        Ok(CursorPage::new(
            items,
            next_cursor.map(|cursor| cursor.encode()),
        ))
    }
}
