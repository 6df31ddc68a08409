// src/infrastructure/repositories/postgres_tracking.rs
use super::map_sqlx;
use super::postgres_listing::{LISTING_COLUMNS, ListingRow};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::listing::{Listing, ListingId};
use crate::domain::tracking::{
    DailyVisits, DedupWindow, ListingView, ListingViewRepository, MostViewedListing,
    NewListingView, NewSiteVisit, RecordOutcome, SiteVisit, SiteVisitCursor, SiteVisitRepository,
    TrafficStatsRepository, VisitPath, VisitorSessionId,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use tracing::debug;

/// Serializes check-then-insert for one (resource, session) pair until the
/// surrounding transaction ends.
async fn lock_pair(tx: &mut Transaction<'_, Postgres>, key: &str) -> DomainResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key)
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx)?;
    Ok(())
}

#[derive(Clone)]
pub struct PostgresListingViewRepository {
    pool: PgPool,
}

impl PostgresListingViewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ListingViewRow {
    id: i64,
    listing_id: i64,
    session_id: String,
    ip_address: Option<String>,
    viewed_at: DateTime<Utc>,
}

impl TryFrom<ListingViewRow> for ListingView {
    type Error = DomainError;

    fn try_from(row: ListingViewRow) -> Result<Self, Self::Error> {
        Ok(ListingView {
            id: row.id,
            listing_id: ListingId::new(row.listing_id)?,
            session_id: VisitorSessionId::new(row.session_id)?,
            ip_address: row.ip_address,
            viewed_at: row.viewed_at,
        })
    }
}

#[async_trait]
impl ListingViewRepository for PostgresListingViewRepository {
    async fn record(
        &self,
        view: NewListingView,
        window: DedupWindow,
    ) -> DomainResult<RecordOutcome> {
        let listing_id = i64::from(view.listing_id);
        let key = format!("view:{listing_id}:{}", view.session_id);

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        lock_pair(&mut tx, &key).await?;

        let last: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT MAX(viewed_at) FROM listing_views WHERE listing_id = $1 AND session_id = $2",
        )
        .bind(listing_id)
        .bind(view.session_id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        if !window.should_record(last, view.viewed_at) {
            tx.rollback().await.map_err(map_sqlx)?;
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        sqlx::query(
            "INSERT INTO listing_views (listing_id, session_id, ip_address, viewed_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(listing_id)
        .bind(view.session_id.as_str())
        .bind(view.ip_address.as_deref())
        .bind(view.viewed_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        let bumped = sqlx::query("UPDATE listings SET view_count = view_count + 1 WHERE id = $1")
            .bind(listing_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        if bumped.rows_affected() == 0 {
            return Err(DomainError::NotFound("listing not found".into()));
        }

        tx.commit().await.map_err(map_sqlx)?;
        debug!(%key, "listing view recorded");
        Ok(RecordOutcome::Recorded)
    }

    async fn latest_for(
        &self,
        listing_id: ListingId,
        session_id: &VisitorSessionId,
    ) -> DomainResult<Option<ListingView>> {
        let row = sqlx::query_as::<_, ListingViewRow>(
            "SELECT id, listing_id, session_id, ip_address, viewed_at
             FROM listing_views WHERE listing_id = $1 AND session_id = $2
             ORDER BY viewed_at DESC, id DESC LIMIT 1",
        )
        .bind(i64::from(listing_id))
        .bind(session_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(ListingView::try_from).transpose()
    }
}

#[derive(Clone)]
pub struct PostgresSiteVisitRepository {
    pool: PgPool,
}

impl PostgresSiteVisitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SiteVisitRow {
    id: i64,
    path: String,
    session_id: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    referrer: Option<String>,
    visited_at: DateTime<Utc>,
}

impl TryFrom<SiteVisitRow> for SiteVisit {
    type Error = DomainError;

    fn try_from(row: SiteVisitRow) -> Result<Self, Self::Error> {
        Ok(SiteVisit {
            id: row.id,
            path: VisitPath::new(row.path)?,
            session_id: VisitorSessionId::new(row.session_id)?,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            referrer: row.referrer,
            visited_at: row.visited_at,
        })
    }
}

#[async_trait]
impl SiteVisitRepository for PostgresSiteVisitRepository {
    async fn record(
        &self,
        visit: NewSiteVisit,
        window: DedupWindow,
    ) -> DomainResult<RecordOutcome> {
        let key = format!("visit:{}:{}", visit.path, visit.session_id);

        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        lock_pair(&mut tx, &key).await?;

        let last: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT MAX(visited_at) FROM site_visits WHERE path = $1 AND session_id = $2",
        )
        .bind(visit.path.as_str())
        .bind(visit.session_id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        if !window.should_record(last, visit.visited_at) {
            tx.rollback().await.map_err(map_sqlx)?;
            return Ok(RecordOutcome::AlreadyRecorded);
        }

        sqlx::query(
            "INSERT INTO site_visits (path, session_id, ip_address, user_agent, referrer, visited_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(visit.path.as_str())
        .bind(visit.session_id.as_str())
        .bind(visit.ip_address.as_deref())
        .bind(visit.user_agent.as_deref())
        .bind(visit.referrer.as_deref())
        .bind(visit.visited_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        tx.commit().await.map_err(map_sqlx)?;
        Ok(RecordOutcome::Recorded)
    }

    async fn list_page(
        &self,
        limit: u32,
        cursor: Option<SiteVisitCursor>,
    ) -> DomainResult<(Vec<SiteVisit>, Option<SiteVisitCursor>)> {
        let limit = limit.clamp(1, 200);
        let fetch_limit = i64::from(limit) + 1;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, path, session_id, ip_address, user_agent, referrer, visited_at FROM site_visits",
        );
        if let Some(cursor) = &cursor {
            builder.push(" WHERE (visited_at, id) < (");
            builder.push_bind(cursor.visited_at);
            builder.push(", ");
            builder.push_bind(cursor.id);
            builder.push(")");
        }
        builder.push(" ORDER BY visited_at DESC, id DESC LIMIT ");
        builder.push_bind(fetch_limit);

        let rows = builder
            .build_query_as::<SiteVisitRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut visits = rows
            .into_iter()
            .map(SiteVisit::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let mut next_cursor = None;
        if visits.len() > usize::try_from(limit).unwrap_or(usize::MAX) {
            visits.pop();
            if let Some(last) = visits.last() {
                next_cursor = Some(SiteVisitCursor::new(last.visited_at, last.id));
            }
        }

        Ok((visits, next_cursor))
    }
}

#[derive(Clone)]
pub struct PostgresTrafficStatsRepository {
    pool: PgPool,
}

impl PostgresTrafficStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str, since: DateTime<Utc>) -> DomainResult<u64> {
        let total: i64 = sqlx::query_scalar(sql)
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[derive(Debug, FromRow)]
struct DailyVisitsRow {
    day: NaiveDate,
    views: i64,
}

#[async_trait]
impl TrafficStatsRepository for PostgresTrafficStatsRepository {
    async fn unique_visitors(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        self.count(
            "SELECT COUNT(DISTINCT session_id) FROM site_visits WHERE visited_at >= $1",
            since,
        )
        .await
    }

    async fn page_views(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM site_visits WHERE visited_at >= $1",
            since,
        )
        .await
    }

    async fn listing_views(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM listing_views WHERE viewed_at >= $1",
            since,
        )
        .await
    }

    async fn most_viewed(&self, limit: u32) -> DomainResult<Vec<MostViewedListing>> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings ORDER BY view_count DESC, id ASC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter()
            .map(|row| {
                let listing = Listing::try_from(row)?;
                Ok::<_, DomainError>(MostViewedListing::from(&listing))
            })
            .collect()
    }

    async fn daily_visits(&self, since: DateTime<Utc>) -> DomainResult<Vec<DailyVisits>> {
        let rows = sqlx::query_as::<_, DailyVisitsRow>(
            "SELECT (visited_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS views
             FROM site_visits WHERE visited_at >= $1
             GROUP BY day ORDER BY day",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows
            .into_iter()
            .map(|row| DailyVisits {
                date: row.day,
                views: u64::try_from(row.views).unwrap_or_default(),
            })
            .collect())
    }
}
