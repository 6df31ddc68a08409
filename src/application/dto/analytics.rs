use crate::domain::tracking::{DailyVisits, MostViewedListing, SiteVisit};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::serde_time;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MostViewedDto {
    pub listing_id: i64,
    pub name: String,
    pub slug: String,
    pub views: i64,
}

impl From<MostViewedListing> for MostViewedDto {
    fn from(value: MostViewedListing) -> Self {
        Self {
            listing_id: value.listing_id.into(),
            name: value.name,
            slug: value.slug,
            views: value.views,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyVisitsDto {
    pub date: NaiveDate,
    pub views: u64,
}

impl From<DailyVisits> for DailyVisitsDto {
    fn from(value: DailyVisits) -> Self {
        Self {
            date: value.date,
            views: value.views,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsSummaryDto {
    pub days: u32,
    #[serde(with = "serde_time")]
    pub since: DateTime<Utc>,
    pub unique_visitors: u64,
    pub total_page_views: u64,
    pub listing_views: u64,
    pub most_viewed: Vec<MostViewedDto>,
    pub daily_visits: Vec<DailyVisitsDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SiteVisitDto {
    pub id: i64,
    pub path: String,
    pub session_id: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(with = "serde_time")]
    pub visited_at: DateTime<Utc>,
}

impl From<SiteVisit> for SiteVisitDto {
    fn from(visit: SiteVisit) -> Self {
        Self {
            id: visit.id,
            path: visit.path.as_str().to_string(),
            session_id: visit.session_id.as_str().to_string(),
            ip_address: visit.ip_address,
            user_agent: visit.user_agent,
            referrer: visit.referrer,
            visited_at: visit.visited_at,
        }
    }
}
