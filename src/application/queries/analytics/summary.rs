use super::AnalyticsQueryService;
use crate::application::{
    dto::{AnalyticsSummaryDto, AuthenticatedUser},
    error::{ApplicationError, ApplicationResult},
};
use chrono::Duration;

pub const DEFAULT_DAYS: u32 = 30;
pub const MAX_DAYS: u32 = 365;
const MOST_VIEWED_LIMIT: u32 = 10;

pub struct AnalyticsSummaryQuery {
    pub days: Option<u32>,
}

impl AnalyticsQueryService {
    pub async fn summary(
        &self,
        actor: &AuthenticatedUser,
        query: AnalyticsSummaryQuery,
    ) -> ApplicationResult<AnalyticsSummaryDto> {
        self.ensure_can_read(actor)?;

        let days = query.days.unwrap_or(DEFAULT_DAYS);
        if !(1..=MAX_DAYS).contains(&days) {
            return Err(ApplicationError::validation(format!(
                "days must be between 1 and {MAX_DAYS}"
            )));
        }

        let since = self.clock.now() - Duration::days(i64::from(days));

        let unique_visitors = self.stats_repo.unique_visitors(since).await?;
        let total_page_views = self.stats_repo.page_views(since).await?;
        let listing_views = self.stats_repo.listing_views(since).await?;
        let most_viewed = self.stats_repo.most_viewed(MOST_VIEWED_LIMIT).await?;
        let daily_visits = self.stats_repo.daily_visits(since).await?;

        Ok(AnalyticsSummaryDto {
            days,
            since,
            unique_visitors,
            total_page_views,
            listing_views,
            most_viewed: most_viewed.into_iter().map(Into::into).collect(),
            daily_visits: daily_visits.into_iter().map(Into::into).collect(),
        })
    }
}
